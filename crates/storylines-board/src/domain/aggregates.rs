//! Aggregate root for the Board context.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use storylines_core::aggregate::AggregateRoot;
use storylines_core::clock::Clock;
use storylines_core::error::DomainError;
use storylines_core::event::EventMetadata;
use storylines_core::id::IdGenerator;
use storylines_core::rng::DeterministicRng;
use storylines_worldbuilding::WorldbuildingNotes;
use uuid::Uuid;

use super::commands::NotesEdit;
use super::defaults::{
    MAIN_PLOTLINE_COLOR, MAIN_PLOTLINE_NAME, NEW_PLOTLINE_NAME, sample_plotlines, sample_scenes,
};
use super::events::{
    BoardEvent, BoardEventKind, BookRetitled, NotesEdited, PlotlineAdded, PlotlineDeleted,
    PlotlineRecolored, PlotlineRenamed, SceneAdded, SceneDeleted, SceneMoved, SceneUpdated,
};
use super::model::{Plotline, Scene, SceneDraft, ScenePatch};

/// One book: its plotlines, the global scene order they share, and the
/// world-building notes that travel with it.
///
/// `scenes` is kept in position order at all times, so a scene's position is
/// always its index in the vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Aggregate identifier.
    pub id: String,
    title: String,
    /// Milliseconds since the Unix epoch of the last successful mutation.
    #[serde(default)]
    last_modified: i64,
    plotlines: Vec<Plotline>,
    scenes: Vec<Scene>,
    #[serde(flatten)]
    notes: WorldbuildingNotes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ui_state: Option<Value>,
    /// Uncommitted events pending persistence.
    #[serde(skip)]
    uncommitted_events: Vec<BoardEvent>,
}

impl Book {
    /// Builds a book from its parts, ordering the scenes by their stored
    /// position.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the parts break referential
    /// integrity (see [`Book::validate`]).
    pub fn new(
        id: String,
        title: String,
        plotlines: Vec<Plotline>,
        scenes: Vec<Scene>,
        last_modified: i64,
    ) -> Result<Self, DomainError> {
        let mut book = Self {
            id,
            title,
            last_modified,
            plotlines,
            scenes,
            notes: WorldbuildingNotes::default(),
            ui_state: None,
            uncommitted_events: Vec::new(),
        };
        book.validate()?;
        book.normalize_positions();
        Ok(book)
    }

    /// The sample book every fresh library starts with: two plotlines and
    /// three scenes.
    #[must_use]
    pub fn sample(id: String, title: String, clock: &dyn Clock) -> Self {
        Self {
            id,
            title,
            last_modified: clock.now_millis(),
            plotlines: sample_plotlines(),
            scenes: sample_scenes(),
            notes: WorldbuildingNotes::default(),
            ui_state: None,
            uncommitted_events: Vec::new(),
        }
    }

    /// An empty book with a single main plotline.
    #[must_use]
    pub fn blank(id: String, title: String, clock: &dyn Clock, ids: &dyn IdGenerator) -> Self {
        Self {
            id,
            title,
            last_modified: clock.now_millis(),
            plotlines: vec![Plotline {
                id: ids.next_id("p"),
                name: MAIN_PLOTLINE_NAME.to_owned(),
                color: MAIN_PLOTLINE_COLOR.to_owned(),
            }],
            scenes: Vec::new(),
            notes: WorldbuildingNotes::default(),
            ui_state: None,
            uncommitted_events: Vec::new(),
        }
    }

    /// Returns the book title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the last modification time in milliseconds since the epoch.
    #[must_use]
    pub fn last_modified(&self) -> i64 {
        self.last_modified
    }

    /// Returns the plotlines in display order.
    #[must_use]
    pub fn plotlines(&self) -> &[Plotline] {
        &self.plotlines
    }

    /// Returns all scenes in position order.
    #[must_use]
    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    /// Returns the world-building notes.
    #[must_use]
    pub fn notes(&self) -> &WorldbuildingNotes {
        &self.notes
    }

    /// Returns the opaque UI state saved by the front end.
    #[must_use]
    pub fn ui_state(&self) -> Option<&Value> {
        self.ui_state.as_ref()
    }

    /// Looks up a plotline.
    #[must_use]
    pub fn plotline(&self, plotline_id: &str) -> Option<&Plotline> {
        self.plotlines.iter().find(|p| p.id == plotline_id)
    }

    /// Looks up a scene.
    #[must_use]
    pub fn scene(&self, scene_id: &str) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.id == scene_id)
    }

    /// Returns the scene occupying a board slot, if any.
    #[must_use]
    pub fn scene_at(&self, plotline_id: &str, position: usize) -> Option<&Scene> {
        self.scenes
            .get(position)
            .filter(|s| s.plotline_id == plotline_id)
    }

    /// Scenes of one plotline, in reading order.
    pub fn scenes_on<'a>(&'a self, plotline_id: &'a str) -> impl Iterator<Item = &'a Scene> + 'a {
        self.scenes.iter().filter(move |s| s.plotline_id == plotline_id)
    }

    fn scene_index(&self, scene_id: &str) -> Option<usize> {
        self.scenes.iter().position(|s| s.id == scene_id)
    }

    fn require_plotline(&self, plotline_id: &str) -> Result<(), DomainError> {
        if self.plotline(plotline_id).is_some() {
            Ok(())
        } else {
            Err(DomainError::not_found("plotline", plotline_id))
        }
    }

    /// Checks referential integrity: at least one plotline, unique ids, and
    /// every scene pointing at an existing plotline.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` describing the first violation.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.plotlines.is_empty() {
            return Err(DomainError::Validation(format!(
                "book {} has no plotline",
                self.id
            )));
        }
        let mut plotline_ids = HashSet::new();
        for plotline in &self.plotlines {
            if !plotline_ids.insert(plotline.id.as_str()) {
                return Err(DomainError::Validation(format!(
                    "duplicate plotline id {}",
                    plotline.id
                )));
            }
        }
        let mut scene_ids = HashSet::new();
        for scene in &self.scenes {
            if !scene_ids.insert(scene.id.as_str()) {
                return Err(DomainError::Validation(format!(
                    "duplicate scene id {}",
                    scene.id
                )));
            }
            if !plotline_ids.contains(scene.plotline_id.as_str()) {
                return Err(DomainError::Validation(format!(
                    "scene {} references unknown plotline {}",
                    scene.id, scene.plotline_id
                )));
            }
        }
        Ok(())
    }

    /// Orders scenes by their stored position (ties keep array order) and
    /// renumbers them densely.
    pub fn normalize_positions(&mut self) {
        self.scenes.sort_by_key(|s| s.position);
        self.reindex();
    }

    /// Repairs a book read from storage so that every invariant holds again:
    /// a missing plotline is recreated, orphaned or duplicate scenes are
    /// dropped and positions are renumbered. Returns the number of repairs.
    pub fn restore_invariants(&mut self, ids: &dyn IdGenerator) -> usize {
        let mut repairs = 0;
        if self.plotlines.is_empty() {
            self.plotlines.push(Plotline {
                id: ids.next_id("p"),
                name: MAIN_PLOTLINE_NAME.to_owned(),
                color: MAIN_PLOTLINE_COLOR.to_owned(),
            });
            repairs += 1;
        }

        let mut seen_plotlines = HashSet::new();
        let before = self.plotlines.len();
        self.plotlines.retain(|p| seen_plotlines.insert(p.id.clone()));
        repairs += before - self.plotlines.len();

        let mut seen_scenes = HashSet::new();
        let before = self.scenes.len();
        self.scenes.retain(|s| {
            seen_plotlines.contains(&s.plotline_id) && seen_scenes.insert(s.id.clone())
        });
        repairs += before - self.scenes.len();

        self.normalize_positions();
        repairs
    }

    /// Recomputes every scene position from its array index.
    fn reindex(&mut self) {
        for (index, scene) in self.scenes.iter_mut().enumerate() {
            scene.position = index;
        }
    }

    fn record(&mut self, kind: BoardEventKind, correlation_id: Uuid, clock: &dyn Clock) {
        let occurred_at = clock.now();
        self.last_modified = occurred_at.timestamp_millis();
        let event = BoardEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: kind.event_type().to_owned(),
                aggregate_id: self.id.clone(),
                correlation_id,
                occurred_at,
            },
            kind,
        };
        self.uncommitted_events.push(event);
    }

    /// Changes the book title.
    pub fn retitle(&mut self, title: String, correlation_id: Uuid, clock: &dyn Clock) {
        self.title.clone_from(&title);
        self.record(
            BoardEventKind::BookRetitled(BookRetitled { title }),
            correlation_id,
            clock,
        );
    }

    /// Appends a plotline with a random hue and returns its id.
    pub fn add_plotline(
        &mut self,
        name: Option<String>,
        correlation_id: Uuid,
        clock: &dyn Clock,
        ids: &dyn IdGenerator,
        rng: &mut dyn DeterministicRng,
    ) -> String {
        let plotline = Plotline {
            id: ids.next_id("p"),
            name: name.unwrap_or_else(|| NEW_PLOTLINE_NAME.to_owned()),
            color: format!("hsl({}, 70%, 50%)", rng.next_u32_range(0, 359)),
        };
        let payload = PlotlineAdded {
            plotline_id: plotline.id.clone(),
            name: plotline.name.clone(),
            color: plotline.color.clone(),
        };
        let id = plotline.id.clone();
        self.plotlines.push(plotline);
        self.record(BoardEventKind::PlotlineAdded(payload), correlation_id, clock);
        id
    }

    /// Renames a plotline.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EntityNotFound` if the plotline does not exist.
    pub fn rename_plotline(
        &mut self,
        plotline_id: &str,
        name: String,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        let plotline = self
            .plotlines
            .iter_mut()
            .find(|p| p.id == plotline_id)
            .ok_or_else(|| DomainError::not_found("plotline", plotline_id))?;
        plotline.name.clone_from(&name);
        self.record(
            BoardEventKind::PlotlineRenamed(PlotlineRenamed {
                plotline_id: plotline_id.to_owned(),
                name,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Changes a plotline's display color.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EntityNotFound` if the plotline does not exist.
    pub fn recolor_plotline(
        &mut self,
        plotline_id: &str,
        color: String,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        let plotline = self
            .plotlines
            .iter_mut()
            .find(|p| p.id == plotline_id)
            .ok_or_else(|| DomainError::not_found("plotline", plotline_id))?;
        plotline.color.clone_from(&color);
        self.record(
            BoardEventKind::PlotlineRecolored(PlotlineRecolored {
                plotline_id: plotline_id.to_owned(),
                color,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Deletes a plotline and every scene on it, then closes the gaps.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EntityNotFound` if the plotline does not exist
    /// and `DomainError::Validation` if it is the last plotline of the book.
    /// The book is unchanged in both cases.
    pub fn delete_plotline(
        &mut self,
        plotline_id: &str,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.require_plotline(plotline_id)?;
        if self.plotlines.len() <= 1 {
            return Err(DomainError::Validation(
                "a book must keep at least one plotline".to_owned(),
            ));
        }

        self.plotlines.retain(|p| p.id != plotline_id);
        let removed_scene_ids: Vec<String> = self
            .scenes_on(plotline_id)
            .map(|s| s.id.clone())
            .collect();
        self.scenes.retain(|s| s.plotline_id != plotline_id);
        self.reindex();

        self.record(
            BoardEventKind::PlotlineDeleted(PlotlineDeleted {
                plotline_id: plotline_id.to_owned(),
                removed_scene_ids,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    fn insert_scene(
        &mut self,
        plotline_id: &str,
        at_position: Option<usize>,
        draft: SceneDraft,
        ids: &dyn IdGenerator,
    ) -> SceneAdded {
        let index = at_position
            .unwrap_or(self.scenes.len())
            .min(self.scenes.len());
        let scene = Scene {
            id: ids.next_id("s"),
            plotline_id: plotline_id.to_owned(),
            title: draft.title,
            content: draft.content,
            position: index,
            is_completed: false,
        };
        let added = SceneAdded {
            scene_id: scene.id.clone(),
            plotline_id: plotline_id.to_owned(),
            position: index,
        };
        self.scenes.insert(index, scene);
        self.reindex();
        added
    }

    /// Inserts an empty scene at `at_position` (appending when `None` or past
    /// the end) and returns its id. Every later scene shifts one column right.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EntityNotFound` if the plotline does not exist.
    pub fn add_scene(
        &mut self,
        plotline_id: &str,
        at_position: Option<usize>,
        correlation_id: Uuid,
        clock: &dyn Clock,
        ids: &dyn IdGenerator,
    ) -> Result<String, DomainError> {
        self.require_plotline(plotline_id)?;
        let added = self.insert_scene(plotline_id, at_position, SceneDraft::default(), ids);
        let id = added.scene_id.clone();
        self.record(BoardEventKind::SceneAdded(added), correlation_id, clock);
        Ok(id)
    }

    /// Appends one scene per draft to the end of the board, in order, all on
    /// the same plotline. Returns the new ids.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EntityNotFound` if the plotline does not exist.
    pub fn add_scenes(
        &mut self,
        plotline_id: &str,
        drafts: Vec<SceneDraft>,
        correlation_id: Uuid,
        clock: &dyn Clock,
        ids: &dyn IdGenerator,
    ) -> Result<Vec<String>, DomainError> {
        self.require_plotline(plotline_id)?;
        let mut created = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let added = self.insert_scene(plotline_id, None, draft, ids);
            created.push(added.scene_id.clone());
            self.record(BoardEventKind::SceneAdded(added), correlation_id, clock);
        }
        Ok(created)
    }

    /// Moves a scene to `target_index` (computed against the other scenes,
    /// clamped to the end) on `target_plotline_id`.
    ///
    /// Dropping a scene back onto its own slot changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EntityNotFound` if the scene or the target
    /// plotline does not exist. The book is unchanged in both cases.
    pub fn move_scene(
        &mut self,
        scene_id: &str,
        target_index: usize,
        target_plotline_id: &str,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        let from = self
            .scene_index(scene_id)
            .ok_or_else(|| DomainError::not_found("scene", scene_id))?;
        self.require_plotline(target_plotline_id)?;

        let to = target_index.min(self.scenes.len() - 1);
        if to == from && self.scenes[from].plotline_id == target_plotline_id {
            return Ok(());
        }

        let mut scene = self.scenes.remove(from);
        let from_plotline_id =
            std::mem::replace(&mut scene.plotline_id, target_plotline_id.to_owned());
        self.scenes.insert(to, scene);
        self.reindex();

        self.record(
            BoardEventKind::SceneMoved(SceneMoved {
                scene_id: scene_id.to_owned(),
                from_plotline_id,
                to_plotline_id: target_plotline_id.to_owned(),
                from_position: from,
                to_position: to,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Merges `patch` into a scene. Position and plotline are never touched.
    /// An empty patch changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EntityNotFound` if the scene does not exist.
    pub fn update_scene(
        &mut self,
        scene_id: &str,
        patch: ScenePatch,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        let index = self
            .scene_index(scene_id)
            .ok_or_else(|| DomainError::not_found("scene", scene_id))?;
        if patch.is_empty() {
            return Ok(());
        }
        let fields = patch
            .field_names()
            .into_iter()
            .map(str::to_owned)
            .collect();
        patch.apply_to(&mut self.scenes[index]);
        self.record(
            BoardEventKind::SceneUpdated(SceneUpdated {
                scene_id: scene_id.to_owned(),
                fields,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Deletes one scene and closes the gap.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EntityNotFound` if the scene does not exist.
    pub fn delete_scene(
        &mut self,
        scene_id: &str,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        let index = self
            .scene_index(scene_id)
            .ok_or_else(|| DomainError::not_found("scene", scene_id))?;
        let scene = self.scenes.remove(index);
        self.reindex();
        self.record(
            BoardEventKind::SceneDeleted(SceneDeleted {
                scene_id: scene.id,
                plotline_id: scene.plotline_id,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Applies one world-building edit and returns the id of any entity it
    /// created.
    ///
    /// # Errors
    ///
    /// Propagates the validation and not-found errors of the notes; the
    /// book is unchanged when an edit fails.
    pub fn edit_notes(
        &mut self,
        edit: NotesEdit,
        correlation_id: Uuid,
        clock: &dyn Clock,
        ids: &dyn IdGenerator,
    ) -> Result<Option<String>, DomainError> {
        let section = edit.section().to_owned();
        let notes = &mut self.notes;
        let created_id = match edit {
            NotesEdit::AddEntry { kind } => Some(notes.add_entry(kind, ids)),
            NotesEdit::RenameEntry {
                kind,
                entry_id,
                name,
            } => {
                notes.rename_entry(kind, &entry_id, name)?;
                None
            }
            NotesEdit::SetAnswer {
                kind,
                entry_id,
                key,
                value,
            } => {
                notes.set_answer(kind, &entry_id, &key, value)?;
                None
            }
            NotesEdit::SetEntryImage {
                kind,
                entry_id,
                image_url,
            } => {
                notes.set_entry_image(kind, &entry_id, image_url)?;
                None
            }
            NotesEdit::DeleteEntry { kind, entry_id } => {
                notes.delete_entry(kind, &entry_id)?;
                None
            }
            NotesEdit::AddCustomQuestion {
                kind,
                entry_id,
                label,
            } => Some(notes.add_custom_question(kind, &entry_id, &label, ids)?),
            NotesEdit::RemoveCustomQuestion {
                kind,
                entry_id,
                field_id,
            } => {
                notes.remove_custom_question(kind, &entry_id, &field_id)?;
                None
            }
            NotesEdit::AddNode => Some(notes.add_node(ids)),
            NotesEdit::MoveNode { node_id, x, y } => {
                notes.move_node(&node_id, x, y)?;
                None
            }
            NotesEdit::RenameNode { node_id, name } => {
                notes.rename_node(&node_id, name)?;
                None
            }
            NotesEdit::SetNodeImage { node_id, image_url } => {
                notes.set_node_image(&node_id, image_url)?;
                None
            }
            NotesEdit::RemoveNode { node_id } => {
                notes.remove_node(&node_id)?;
                None
            }
            NotesEdit::Connect { from_id, to_id } => Some(notes.connect(&from_id, &to_id, ids)?),
            NotesEdit::DescribeConnection {
                connection_id,
                description,
            } => {
                notes.describe_connection(&connection_id, description)?;
                None
            }
            NotesEdit::RemoveConnection { connection_id } => {
                notes.remove_connection(&connection_id)?;
                None
            }
        };

        self.record(
            BoardEventKind::NotesEdited(NotesEdited {
                section,
                created_id: created_id.clone(),
            }),
            correlation_id,
            clock,
        );
        Ok(created_id)
    }
}

impl AggregateRoot for Book {
    type Event = BoardEvent;

    fn aggregate_id(&self) -> &str {
        &self.id
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn take_uncommitted_events(&mut self) -> Vec<Self::Event> {
        std::mem::take(&mut self.uncommitted_events)
    }
}
