// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `gantry job status <key>`: one-shot job status fetch.

use crate::exit_error::ExitError;
use crate::output::{print_job_status, OutputFormat};
use gantry_adapters::{BackendAdapter, HttpBackend};
use gantry_core::JobKey;

pub async fn status(server: &str, key: &str, format: OutputFormat) -> anyhow::Result<()> {
    let backend = HttpBackend::new(server);
    let descriptor = backend
        .job_status(&JobKey::from_string(key))
        .await
        .map_err(|e| ExitError::failure(e.to_string()))?;
    print_job_status(&descriptor, format)
}
