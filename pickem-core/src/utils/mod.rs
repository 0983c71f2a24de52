pub mod dates;
pub mod keyed_lock;
