use serde::Deserialize;

/// Query parameters for `GET /my-posts`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyPostsQuery {
    pub user_email: Option<String>,
}

/// Direction of a vote on a post
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vote {
    Up,
    Down,
}

impl Vote {
    /// Counter field the vote increments
    pub fn counter_field(&self) -> &'static str {
        match self {
            Vote::Up => "upVote",
            Vote::Down => "downVote",
        }
    }
}
