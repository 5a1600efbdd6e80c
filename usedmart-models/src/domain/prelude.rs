pub use super::{
    auth::*, category::*, common::*, favorite::*, message::*, order::*, permission::*,
    product::*, profile::*, role::*, settings::*, stats::*,
};
