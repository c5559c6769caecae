//! Scripted operator for tests

use std::collections::VecDeque;

use super::OperatorChannel;
use crate::error::{NasError, Result};
use crate::session::Session;
use crate::system::Volume;
use crate::version::Version;

/// Answers prompts from queues; an exhausted queue behaves like EOF.
#[derive(Default)]
pub struct ScriptedOperator {
    pub selections: VecDeque<Option<usize>>,
    pub update_answers: VecDeque<bool>,
    pub another_answers: VecDeque<bool>,
    /// Fail the stop wait instead of returning the key
    pub stop_fails: bool,
    pub update_prompts: usize,
    pub stops: usize,
    pub shown: Vec<Session>,
    pub messages: Vec<String>,
}

impl ScriptedOperator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(mut self, index: usize) -> Self {
        self.selections.push_back(Some(index));
        self
    }

    pub fn back_out(mut self) -> Self {
        self.selections.push_back(None);
        self
    }

    pub fn answer_update(mut self, yes: bool) -> Self {
        self.update_answers.push_back(yes);
        self
    }

    pub fn answer_another(mut self, yes: bool) -> Self {
        self.another_answers.push_back(yes);
        self
    }
}

impl OperatorChannel for ScriptedOperator {
    fn select_volume(&mut self, _volumes: &[Volume]) -> Result<Option<usize>> {
        self.selections.pop_front().ok_or(NasError::InputCancelled)
    }

    fn confirm_update(&mut self, _latest: &Version, _running: &Version) -> Result<bool> {
        self.update_prompts += 1;
        self.update_answers
            .pop_front()
            .ok_or(NasError::InputCancelled)
    }

    fn show_session(&mut self, session: &Session, _addresses: &[String]) {
        self.shown.push(session.clone());
    }

    fn wait_for_stop(&mut self) -> Result<()> {
        self.stops += 1;
        if self.stop_fails {
            return Err(NasError::Input {
                message: "console closed".to_string(),
            });
        }
        Ok(())
    }

    fn confirm_another(&mut self) -> Result<bool> {
        self.another_answers
            .pop_front()
            .ok_or(NasError::InputCancelled)
    }

    fn notify(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}
