//! Acknowledgement for every unrouted path.

/// Body returned for paths with no action.
pub const ACKNOWLEDGEMENT: &str = "Yay! Your function executed successfully!";

/// ANY /*
pub async fn acknowledge() -> &'static str {
    ACKNOWLEDGEMENT
}
