//! # Loop Feed Shared
//! This crate defines shared data structures and types used across the loop
//! feed ecosystem. It includes common definitions for subjects, vote records,
//! vote totals, posts, replies, and user profiles.
pub mod types;
