// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod account;
pub mod facebook;
pub mod google;
pub mod provider;

pub use account::{AccountService, NewAccount};
pub use facebook::FacebookProvider;
pub use google::GoogleProvider;
pub use provider::{IdentityProvider, StaticProvider};
