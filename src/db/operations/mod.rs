pub mod cell_types;
pub mod factors;
pub mod prefectures;
pub mod rankings;
pub mod traffic;
