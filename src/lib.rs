/*
 * SPDX-FileCopyrightText: 2024 Tommaso Fontana
 * SPDX-FileCopyrightText: 2024 Inria
 * SPDX-FileCopyrightText: 2024 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![doc = include_str!("../README.md")]

pub mod codec;
pub mod codes;
pub mod container;
pub mod error;
pub mod impls;
pub mod traits;
pub mod utils;

pub use codec::{decode, decode_with_stats, encode, encode_with_stats};
pub use error::{Error, Result};

/// Prelude module to import everything from this crate
pub mod prelude {
    pub use crate::codec::*;
    pub use crate::codes::*;
    pub use crate::container::*;
    pub use crate::error::*;
    pub use crate::impls::*;
    pub use crate::traits::*;
    pub use crate::utils::*;
}
