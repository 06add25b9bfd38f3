pub mod attendance;
pub mod event;
pub mod qr;
pub mod ticket;
