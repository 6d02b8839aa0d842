// Data Saver - Statistics Module
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! Daily traffic statistics aggregation.

mod daily;

pub use daily::{DailyBuffer, DailyLengths, DAILY_WINDOW_DAYS};
