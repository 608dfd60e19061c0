mod alert;

pub use alert::Alert;
