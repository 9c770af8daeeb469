mod portal;

pub use portal::Portal;
