/// One row of `command_history`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRecord {
    pub command: String,
    pub args: String,
    pub timestamp: String,
}

/// One row of `artifact_history`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRecord {
    pub content: String,
    pub timestamp: String,
}
