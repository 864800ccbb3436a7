//! Prompt construction for dashboard and article generation.
//!
//! The prompts ask for bare JSON, but models routinely wrap replies in
//! markdown fences or add prose anyway. Nothing here depends on the model
//! obeying; downstream parsing is tolerant.

use crate::generator::UploadPrompt;

/// Build the prompt that asks the model for dashboard material.
///
/// The requested reply shape is an object with `summary` (string),
/// `insights` (array of strings), `charts` (array of `{type, title, data,
/// config}` where `type` is one of `bar`, `line`, `pie`, `area` and `data`
/// is `[{name, value}]`), and `metrics` (array of `{name, value, change}`).
pub fn dashboard_prompt(upload: &UploadPrompt) -> String {
    format!(
        "You are a data analyst. Analyze the uploaded file and produce material for an \
         analytics dashboard.\n\
         \n\
         File name: {file_name}\n\
         File type: {file_type}\n\
         File content (base64): {encoded_content}\n\
         \n\
         Respond with a single JSON object and nothing else, in this shape:\n\
         {{\n\
           \"summary\": \"two or three sentences describing the data\",\n\
           \"insights\": [\"a notable finding\", \"another finding\"],\n\
           \"charts\": [\n\
             {{\n\
               \"type\": \"bar\",\n\
               \"title\": \"chart title\",\n\
               \"data\": [{{\"name\": \"label\", \"value\": 123}}],\n\
               \"config\": {{}}\n\
             }}\n\
           ],\n\
           \"metrics\": [{{\"name\": \"metric name\", \"value\": \"42\", \"change\": \"+5%\"}}]\n\
         }}\n\
         \n\
         Use only chart types bar, line, pie, or area. Derive every number from the \
         file content; do not invent data. Do not wrap the JSON in markdown fences.",
        file_name = upload.file_name,
        file_type = upload.file_type,
        encoded_content = upload.encoded_content,
    )
}

/// Build the prompt that asks the model for article metadata suggestions.
///
/// The requested reply shape is an object with `title`, `summary`, `tags`
/// (array of strings), and `metaDescription`.
pub fn article_prompt(content: &str) -> String {
    format!(
        "You are an editor for a product blog. Read the draft below and suggest \
         publishing metadata for it.\n\
         \n\
         Draft:\n\
         {content}\n\
         \n\
         Respond with a single JSON object and nothing else, in this shape:\n\
         {{\n\
           \"title\": \"an engaging title\",\n\
           \"summary\": \"one or two sentences for the article listing\",\n\
           \"tags\": [\"tag1\", \"tag2\", \"tag3\"],\n\
           \"metaDescription\": \"under 160 characters, for search engines\"\n\
         }}\n\
         \n\
         Do not wrap the JSON in markdown fences.",
    )
}
