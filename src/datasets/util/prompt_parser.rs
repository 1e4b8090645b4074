use regex::Regex;

use crate::datasets::models::class_prompts::ClassPrompts;

lazy_static! {
    static ref SEGMENT_DELIMITER: Regex = Regex::new(r"\s*,?\s*\bEND\b\s*,?\s*").unwrap();
}

static INVALID_CLASS_CHARS: [char; 12] = [
    '<', '>', ':', '"', '/', '\\', '|', '?', '*', '\n', '\r', '\t',
];

/// Splits a prompt block such as `Cat/on a sofa/in the snow END Dog/running`
/// into its class segments. Segments without at least one prompt are dropped.
pub fn parse_prompt_block(block: &str) -> Vec<ClassPrompts> {
    let mut vec = Vec::new();

    for segment in SEGMENT_DELIMITER.split(block.trim()) {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }

        let parts: Vec<&str> = segment.split('/').collect();
        if parts.len() < 2 {
            continue;
        }

        let prompts = parts[1..]
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(|p| p.to_string())
            .collect();

        vec.push(ClassPrompts {
            class_name: parts[0].trim().to_string(),
            prompts,
        });
    }

    vec
}

/// Makes a class name safe to use as a directory name.
pub fn sanitize_class_name(class_name: &str) -> String {
    class_name
        .chars()
        .map(|c| {
            if INVALID_CLASS_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect::<String>()
        .to_uppercase()
}
