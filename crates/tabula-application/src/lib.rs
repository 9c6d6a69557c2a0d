pub mod data_chat;

pub use data_chat::DataChat;
