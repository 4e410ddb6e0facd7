mod http;
mod websocket;

pub use http::{callback, get_room_detail, get_rooms, health_check, login};
pub use websocket::websocket_handler;
