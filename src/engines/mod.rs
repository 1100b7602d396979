// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod acquirer;
pub mod browser_engine;
pub mod browser_pool;
pub mod reqwest_engine;
pub mod traits;
