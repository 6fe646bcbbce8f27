//! Editing session: forwards user commands to the model and keeps the
//! derived canvas size in step with the tree's shape.

use tracing::{debug, instrument};

use crate::application::canvas::CanvasSize;
use crate::application::command::Command;
use crate::application::render::TreeRender;
use crate::application::ApplicationResult;
use crate::config::{LayoutSettings, Settings};
use crate::domain::{Metrics, NodeId, Snapshot, TreeModel};

/// What a command produced.
#[derive(Debug, Clone)]
pub enum Outcome {
    Selected(NodeId),
    Updated(Snapshot),
    Shown(Snapshot),
    Measured { metrics: Metrics, canvas: CanvasSize },
}

#[derive(Debug, Clone)]
pub struct EditorSession {
    model: TreeModel,
    layout: LayoutSettings,
    canvas: CanvasSize,
    shape: (usize, usize),
}

impl EditorSession {
    /// Session over the default seed tree, bounded by `settings`.
    pub fn new(settings: &Settings) -> ApplicationResult<Self> {
        let model = TreeModel::new(settings.limits())?;
        Ok(Self::with_model(model, settings.layout))
    }

    pub fn with_model(model: TreeModel, layout: LayoutSettings) -> Self {
        let metrics = model.metrics();
        Self {
            canvas: CanvasSize::from_metrics(&metrics, &layout),
            shape: (metrics.height, metrics.width),
            model,
            layout,
        }
    }

    pub fn model(&self) -> &TreeModel {
        &self.model
    }

    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    #[instrument(level = "debug", skip(self))]
    pub fn apply(&mut self, command: Command) -> ApplicationResult<Outcome> {
        let outcome = match command {
            Command::Select(id) => Outcome::Selected(self.model.select(id)?),
            Command::SetChildCount { id, count } => {
                let snapshot = self.model.set_child_count(id, count)?;
                self.refresh_canvas(&snapshot.metrics);
                Outcome::Updated(snapshot)
            }
            Command::SetValue { id, value } => Outcome::Updated(self.model.set_value(id, value)?),
            Command::Show => Outcome::Shown(self.model.current()),
            Command::Metrics => Outcome::Measured {
                metrics: self.model.metrics(),
                canvas: self.canvas,
            },
        };
        Ok(outcome)
    }

    /// Parses and applies one line of user input.
    pub fn run_line(&mut self, line: &str) -> ApplicationResult<Option<Outcome>> {
        match Command::parse(line)? {
            Some(command) => self.apply(command).map(Some),
            None => Ok(None),
        }
    }

    /// ASCII rendering of the current tree with the selection marked.
    pub fn render(&self) -> String {
        self.model
            .snapshot()
            .to_tree_string(self.model.selection())
            .to_string()
    }

    /// Recomputes the canvas only when height or width changed.
    fn refresh_canvas(&mut self, metrics: &Metrics) -> bool {
        let shape = (metrics.height, metrics.width);
        if shape == self.shape {
            return false;
        }
        self.shape = shape;
        self.canvas = CanvasSize::from_metrics(metrics, &self.layout);
        debug!(canvas = %self.canvas, "canvas resized");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_growth_on_widest_level_when_applying_then_canvas_widens() {
        let mut session = EditorSession::new(&Settings::default()).unwrap();
        assert_eq!(session.canvas(), CanvasSize { width: 400, height: 400 });

        session.run_line("children 5 3").unwrap();

        // Level 4 grows from 6 to 9 nodes
        assert_eq!(session.canvas(), CanvasSize { width: 580, height: 400 });
    }

    #[test]
    fn given_value_edit_when_applying_then_canvas_unchanged() {
        let mut session = EditorSession::new(&Settings::default()).unwrap();
        let before = session.canvas();
        session.run_line("value 5 9").unwrap();
        assert_eq!(session.canvas(), before);
    }
}
