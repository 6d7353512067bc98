// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::job::JobKey;

#[test]
fn short_truncates_long_strings() {
    assert_eq!(short("abcdefgh", 4), "abcd");
}

#[test]
fn short_keeps_short_strings() {
    assert_eq!(short("abc", 8), "abc");
    assert_eq!(short("", 8), "");
}

#[test]
fn generated_keys_carry_prefix_and_are_unique() {
    let a = JobKey::new();
    let b = JobKey::new();
    assert!(a.as_str().starts_with(JobKey::PREFIX));
    assert_ne!(a, b);
}

#[test]
fn wire_keys_are_adopted_verbatim() {
    let key = JobKey::from_string("rq:job:0f7ad60e");
    assert_eq!(key.as_str(), "rq:job:0f7ad60e");
    assert_eq!(key.to_string(), "rq:job:0f7ad60e");
    assert!(!key.is_empty());
}

#[test]
fn key_serde_is_transparent() {
    let key = JobKey::from_string("rq:job:abc");
    let json = serde_json::to_string(&key).unwrap();
    assert_eq!(json, "\"rq:job:abc\"");

    let parsed: JobKey = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, key);
}
