/// One `ClassName/prompt/prompt` segment of a prompt block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassPrompts {
    pub class_name: String,
    pub prompts: Vec<String>,
}
