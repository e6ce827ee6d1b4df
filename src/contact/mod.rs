mod comment;
mod form;
mod store;

pub use comment::{parse_movie_id, CommentSubmission, NewComment};
pub use form::{
    is_valid_email, ContactMessage, ContactRules, ContactSubmission, FormRejection, Screening,
    TOO_FAST,
};
pub use store::{
    Comment, ContactStore, DbPool, MessageQuery, PageDirection, StoredMessage,
};
