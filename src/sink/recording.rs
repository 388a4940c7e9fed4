// (c) Copyright 2025 Helsing GmbH. All rights reserved.
//! This module contains an implementation of [`Sink`] that simply records
//! all calls in a human readable form. This is mostly useful for tests.

use crate::{IndexPath, Sink};

/// A sink that records all calls.
#[derive(Debug, Default)]
pub struct RecordingSink {
    /// A string-representation of each call that the sink has received.
    /// This is mostly useful for tests.
    pub calls: Vec<String>,
}

impl RecordingSink {
    /// Create a new RecordingSink
    pub fn new() -> RecordingSink {
        RecordingSink { calls: vec![] }
    }
}

impl Sink for RecordingSink {
    type Animation = &'static str;
    type Cell = String;

    fn reload_all(&mut self) {
        self.calls.push("reload_all".to_owned());
    }

    fn begin_batch(&mut self) {
        self.calls.push("begin_batch".to_owned());
    }

    fn end_batch(&mut self) {
        self.calls.push("end_batch".to_owned());
    }

    fn insert_child(&mut self, position: usize, parent: &IndexPath, style: Option<&&'static str>) {
        let style = style.copied().unwrap_or("none");
        self.calls
            .push(format!("insert {position} under {parent} ({style})"));
    }

    fn remove_child(&mut self, position: usize, parent: &IndexPath, style: Option<&&'static str>) {
        let style = style.copied().unwrap_or("none");
        self.calls
            .push(format!("remove {position} under {parent} ({style})"));
    }

    fn reload_child(&mut self, position: usize, parent: &IndexPath) {
        self.calls.push(format!("reload {position} under {parent}"));
    }

    fn move_child(
        &mut self,
        from_position: usize,
        from_parent: &IndexPath,
        to_position: usize,
        to_parent: &IndexPath,
    ) {
        self.calls.push(format!(
            "move {from_position} under {from_parent} -> {to_position} under {to_parent}"
        ));
    }
}
