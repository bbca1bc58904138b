// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapters to integrate with other Understory crates.
//!
//! - [`dom`] (`dom_adapter` feature): [`LayerHost`](crate::LayerHost) for
//!   `understory_dom`.

#[cfg(feature = "dom_adapter")]
pub mod dom;
