pub mod check;
pub mod checkin;
pub mod checkout;
pub mod locations;
pub mod release;
pub mod tag;
pub mod update;

pub use check::*;
pub use checkin::*;
pub use checkout::*;
pub use locations::*;
pub use release::*;
pub use tag::*;
pub use update::*;
