//! Fixed prompt sent to the generation service.

const PREAMBLE: &str = "Generate a PlantUML diagram in .puml syntax that represents the data model \
                        and primary flows described in this Markdown:";

const CLOSING: &str = "Provide only the .puml code.";

/// Wrap the extracted Markdown in the diagram instruction.
pub fn build_prompt(markdown: &str) -> String {
    format!("{PREAMBLE}\n\n{markdown}\n\n{CLOSING}")
        .trim()
        .to_string()
}
