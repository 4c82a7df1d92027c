pub mod add;
pub mod answer;
pub mod delete;
pub mod list;
pub mod next;
pub mod reset;
pub mod review;
pub mod settings;
pub mod stats;
