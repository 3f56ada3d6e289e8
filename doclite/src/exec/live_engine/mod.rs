// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Live query commands

pub mod live_unsubscribe;

pub use live_unsubscribe::*;
