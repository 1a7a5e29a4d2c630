//! Research execution over a [`ResearchPlan`].

use crate::{BoxError, Error, ResearchPlan, Result};
use async_trait::async_trait;
use scaffold_task_graph::{DependencyGraph, TaskId, TaskNodeData};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info};

/// Research runner configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchConfig {
    /// Maximum research jobs in flight within one level (0 = unlimited)
    pub max_concurrency: usize,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self { max_concurrency: 4 }
    }
}

/// Notes already produced for a prerequisite task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrerequisiteNote {
    /// The prerequisite task.
    pub id: TaskId,
    /// Its title.
    pub title: String,
    /// The research notes produced for it.
    pub notes: String,
}

/// Everything a [`Researcher`] gets to work on one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResearchRequest {
    /// The task to research.
    pub id: TaskId,
    /// Its title.
    pub title: String,
    /// Its implementation details.
    pub details: String,
    /// Notes of its transitive prerequisites, dependencies first.
    pub prerequisites: Vec<PrerequisiteNote>,
}

/// Produces research notes for a single task.
#[async_trait]
pub trait Researcher: Send + Sync {
    /// Research one task and return the notes.
    async fn research(&self, request: &ResearchRequest) -> std::result::Result<String, BoxError>;
}

/// Outcome of a research run.
#[derive(Debug, Clone)]
pub struct ResearchReport {
    plan: ResearchPlan,
    notes: HashMap<TaskId, String>,
}

impl ResearchReport {
    /// The plan the run followed.
    #[must_use]
    pub fn plan(&self) -> &ResearchPlan {
        &self.plan
    }

    /// Notes produced for a task.
    #[must_use]
    pub fn notes_for(&self, id: &TaskId) -> Option<&str> {
        self.notes.get(id).map(String::as_str)
    }

    /// Notes in plan order.
    pub fn iter(&self) -> impl Iterator<Item = (&TaskId, &str)> {
        self.plan
            .order()
            .filter_map(|id| self.notes_for(id).map(|notes| (id, notes)))
    }

    /// Number of researched tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Whether no task was researched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

/// Runs research for a task graph with an injected [`Researcher`].
pub struct ResearchRunner<R: ?Sized> {
    researcher: Arc<R>,
    config: ResearchConfig,
}

impl<R> ResearchRunner<R>
where
    R: Researcher + ?Sized + 'static,
{
    /// Create a runner around a researcher.
    #[must_use]
    pub fn new(researcher: Arc<R>, config: ResearchConfig) -> Self {
        Self { researcher, config }
    }

    /// The runner configuration.
    #[must_use]
    pub fn config(&self) -> &ResearchConfig {
        &self.config
    }

    /// Research every task of `graph`, prerequisites before dependents.
    ///
    /// Levels run one after another; the tasks of a level run concurrently on
    /// the current tokio runtime, up to `max_concurrency` at a time.
    ///
    /// # Errors
    ///
    /// Returns the first researcher failure as [`Error::ResearchFailed`]; the
    /// jobs still in flight are aborted.
    pub async fn run<T: TaskNodeData>(&self, graph: &DependencyGraph<T>) -> Result<ResearchReport> {
        let plan = ResearchPlan::from_graph(graph);
        let mut notes: HashMap<TaskId, String> = HashMap::new();

        info!(
            tasks = plan.len(),
            levels = plan.levels().len(),
            fallback = plan.is_fallback(),
            max_concurrency = self.config.max_concurrency,
            "Starting research"
        );

        for (level_index, level) in plan.levels().iter().enumerate() {
            let mut join_set = JoinSet::new();
            let mut pending = level.iter();

            loop {
                while self.config.max_concurrency == 0
                    || join_set.len() < self.config.max_concurrency
                {
                    let Some(id) = pending.next() else {
                        break;
                    };
                    let request = build_request(graph, id, &notes);
                    let researcher = Arc::clone(&self.researcher);
                    join_set.spawn(async move {
                        let result = researcher.research(&request).await;
                        (request.id, result)
                    });
                }

                let Some(joined) = join_set.join_next().await else {
                    break;
                };
                match joined {
                    Ok((id, Ok(text))) => {
                        debug!(task = %id, level = level_index, "Research completed");
                        notes.insert(id, text);
                    }
                    Ok((task, Err(source))) => {
                        join_set.abort_all();
                        return Err(Error::ResearchFailed { task, source });
                    }
                    Err(err) => {
                        return Err(Error::Aborted {
                            reason: err.to_string(),
                        });
                    }
                }
            }
        }

        info!(researched = notes.len(), "Research finished");
        Ok(ResearchReport { plan, notes })
    }
}

fn build_request<T: TaskNodeData>(
    graph: &DependencyGraph<T>,
    id: &TaskId,
    notes: &HashMap<TaskId, String>,
) -> ResearchRequest {
    let prerequisites = graph
        .dependency_chain(id)
        .into_iter()
        .filter_map(|dep| {
            let notes = notes.get(&dep)?.clone();
            let title = graph.task(&dep).map(|t| t.title().to_string())?;
            Some(PrerequisiteNote {
                id: dep,
                title,
                notes,
            })
        })
        .collect();

    let task = graph.task(id);
    ResearchRequest {
        id: id.clone(),
        title: task.map(|t| t.title().to_string()).unwrap_or_default(),
        details: task.map(|t| t.details().to_string()).unwrap_or_default(),
        prerequisites,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scaffold_task_graph::Task;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn id(position: usize) -> TaskId {
        TaskId::from_position(position)
    }

    /// Records every request and answers with a fixed note per title.
    #[derive(Default)]
    struct RecordingResearcher {
        requests: Mutex<Vec<ResearchRequest>>,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        delay: Option<Duration>,
        fail_on: Option<&'static str>,
    }

    #[async_trait]
    impl Researcher for RecordingResearcher {
        async fn research(
            &self,
            request: &ResearchRequest,
        ) -> std::result::Result<String, BoxError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            self.requests.lock().unwrap().push(request.clone());
            if self.fail_on == Some(request.title.as_str()) {
                return Err("model unavailable".into());
            }
            Ok(format!("notes on {}", request.title))
        }
    }

    fn independent_tasks(count: usize) -> DependencyGraph {
        DependencyGraph::build((0..count).map(|i| Task::new(format!("Module {i}"))))
    }

    #[tokio::test]
    async fn test_prerequisite_notes_are_passed_along() {
        let graph = DependencyGraph::build(vec![
            Task::new("Setup"),
            Task::new("Test after setup").with_details("unit and e2e"),
            Task::new("Deploy after test after setup"),
        ]);
        let researcher = Arc::new(RecordingResearcher::default());
        let runner = ResearchRunner::new(Arc::clone(&researcher), ResearchConfig::default());

        let report = runner.run(&graph).await.unwrap();

        assert_eq!(report.len(), 3);
        assert_eq!(report.notes_for(&id(2)), Some("notes on Test after setup"));
        let order: Vec<&TaskId> = report.iter().map(|(id, _)| id).collect();
        assert_eq!(order, [&id(1), &id(2), &id(3)]);

        let requests = researcher.requests.lock().unwrap();
        let deploy = requests.iter().find(|r| r.id == id(3)).unwrap();
        let prerequisite_ids: Vec<&TaskId> = deploy.prerequisites.iter().map(|p| &p.id).collect();
        assert_eq!(prerequisite_ids, [&id(1), &id(2)]);
        assert_eq!(deploy.prerequisites[0].notes, "notes on Setup");

        let test = requests.iter().find(|r| r.id == id(2)).unwrap();
        assert_eq!(test.details, "unit and e2e");
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let researcher = Arc::new(RecordingResearcher {
            delay: Some(Duration::from_millis(10)),
            ..Default::default()
        });
        let runner = ResearchRunner::new(
            Arc::clone(&researcher),
            ResearchConfig { max_concurrency: 2 },
        );

        let report = runner.run(&independent_tasks(6)).await.unwrap();

        assert_eq!(report.len(), 6);
        assert!(researcher.peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_zero_concurrency_means_unlimited() {
        let researcher = Arc::new(RecordingResearcher {
            delay: Some(Duration::from_millis(20)),
            ..Default::default()
        });
        let runner = ResearchRunner::new(
            Arc::clone(&researcher),
            ResearchConfig { max_concurrency: 0 },
        );

        runner.run(&independent_tasks(4)).await.unwrap();

        assert_eq!(researcher.peak.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_failure_stops_the_run() {
        let graph = DependencyGraph::build(vec![
            Task::new("Broken"),
            Task::new("Ship after broken"),
        ]);
        let researcher = Arc::new(RecordingResearcher {
            fail_on: Some("Broken"),
            ..Default::default()
        });
        let runner = ResearchRunner::new(Arc::clone(&researcher), ResearchConfig::default());

        let err = runner.run(&graph).await.unwrap_err();

        assert!(matches!(err, Error::ResearchFailed { ref task, .. } if *task == id(1)));
        assert_eq!(researcher.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_cycle_researches_in_input_order() {
        let graph = DependencyGraph::build(vec![
            Task::new("A").depends_on("B"),
            Task::new("B").depends_on("A"),
        ]);
        let researcher = Arc::new(RecordingResearcher::default());
        let runner = ResearchRunner::new(Arc::clone(&researcher), ResearchConfig::default());

        let report = runner.run(&graph).await.unwrap();

        assert!(report.plan().is_fallback());
        let requests = researcher.requests.lock().unwrap();
        let seen: Vec<&TaskId> = requests.iter().map(|r| &r.id).collect();
        assert_eq!(seen, [&id(1), &id(2)]);
        // task-2 sees task-1's notes even though the relation is cyclic.
        assert_eq!(requests[1].prerequisites.len(), 1);
    }

    #[tokio::test]
    async fn test_runner_accepts_trait_objects() {
        let researcher: Arc<dyn Researcher> = Arc::new(RecordingResearcher::default());
        let runner = ResearchRunner::new(researcher, ResearchConfig::default());
        let report = runner.run(&independent_tasks(2)).await.unwrap();
        assert_eq!(report.len(), 2);
    }

    #[test]
    fn test_config_defaults_and_deserialization() {
        assert_eq!(ResearchConfig::default().max_concurrency, 4);
        let config: ResearchConfig = serde_json::from_str(r#"{"max_concurrency": 8}"#).unwrap();
        assert_eq!(config.max_concurrency, 8);
        let config: ResearchConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ResearchConfig::default());
    }
}
