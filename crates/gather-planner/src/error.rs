use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("expression '{expr}': {reason}")]
    Expr { expr: String, reason: String },

    #[error("invalid pipeline: {0}")]
    Invalid(String),
}

impl PlanError {
    pub(crate) fn expr(expr: &str, reason: impl Into<String>) -> Self {
        PlanError::Expr {
            expr: expr.to_string(),
            reason: reason.into(),
        }
    }
}
