mod http;

pub use http::{
    fetch_history, health_check, join_room, leave_room, poll_message, send_message,
};
