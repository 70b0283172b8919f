// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
//! TaskFlow server: per-user task lists behind session authentication.
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod guard;
pub mod handlers;
pub mod routes;
pub mod sessions;
pub mod state;
pub mod stats;
pub mod tasks;
pub mod users;
pub mod views;
