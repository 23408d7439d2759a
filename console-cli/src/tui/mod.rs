// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Bencher Contributors

//! TUI module for the Bencher console dashboard.

mod app;

pub use app::run_dashboard;
