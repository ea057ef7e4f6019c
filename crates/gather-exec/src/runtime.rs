//! Runtime: execute a parsed pipeline over a `Number` stream and emit a
//! `RunManifest`.
//!
//! Behavior:
//! - Instantiates one type-erased stage per step on top of the generic
//!   operators in `gather-operators`.
//! - Feeds input elements through the stages in step order; a stage's output
//!   is integrated into the next stage before the next input is pulled.
//! - Stops pulling input as soon as any stage stops, then finishes every
//!   stage exactly once, in step order. Finisher output flows into later
//!   stages unless the receiving stage has already stopped.
//! - Expression failures are captured on first occurrence and abort the run.

use std::cell::Cell;
use std::cmp::Ordering;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

use gather_core::config::ExecConfig;
use gather_core::hash::StreamDigest;
use gather_core::manifest::RunManifest;
use gather_core::{Number, Record};

use gather_operators as ops;
use gather_operators::{Characteristics, Downstream, Gatherer, OpError};

use gather_planner::expr::{EvalError, Expr};
use gather_planner::{rules, ParsedPipeline, PlanError, SortOrder, Step};

use crate::{metrics, replay};

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("plan: {0}")]
    Plan(#[from] PlanError),
    #[error("operator: {0}")]
    Operator(#[from] OpError),
    #[error("step {step}: {source}")]
    Expr {
        step: usize,
        #[source]
        source: EvalError,
    },
    #[error("output record {position} is not a finite number")]
    NonFinite { position: usize },
    #[error("input exceeds max_input_elements ({limit})")]
    InputLimit { limit: usize },
    #[error("{0}")]
    Config(String),
    #[error("{0}")]
    Hash(String),
}

/// Records plus provenance for one run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub records: Vec<Record>,
    pub manifest: RunManifest,
}

pub struct Engine {
    cfg: ExecConfig,
}

impl Engine {
    /// The pipeline's own `config:` block is not consulted here; callers
    /// overlay it with `PipelineConfig::apply_to` before building the engine.
    pub fn new(cfg: ExecConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &ExecConfig {
        &self.cfg
    }

    /// Build the erased stages for `pipeline` without running them.
    pub fn stages(&self, pipeline: &ParsedPipeline) -> Result<Vec<StageInfo>, ExecError> {
        rules::validate(&pipeline.steps)?;
        let errors = ErrorSlot::default();
        pipeline
            .steps
            .iter()
            .enumerate()
            .map(|(i, step)| -> Result<StageInfo, ExecError> {
                let stage = build_stage(i, step, &errors)?;
                Ok(StageInfo {
                    name: stage.name(),
                    characteristics: stage.characteristics(),
                })
            })
            .collect()
    }

    pub fn run<I>(&self, pipeline: &ParsedPipeline, input: I) -> Result<RunOutput, ExecError>
    where
        I: IntoIterator<Item = Number>,
    {
        self.cfg
            .validate()
            .map_err(|e| ExecError::Config(e.to_string()))?;
        rules::validate(&pipeline.steps)?;

        let plan_hash = replay::hash_steps(&pipeline.steps)?;
        let mut manifest = RunManifest::new(plan_hash, now_millis());

        let errors = ErrorSlot::default();
        let mut stages = pipeline
            .steps
            .iter()
            .enumerate()
            .map(|(i, step)| -> Result<Slot, ExecError> {
                Ok(Slot {
                    stage: build_stage(i, step, &errors)?,
                    stopped: false,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        metrics::emit_span(
            "run_start",
            &[
                ("steps", stages.len().to_string()),
                ("plan_hash", plan_hash.to_hex()),
            ],
        );

        let mut records: Vec<Record> = Vec::new();
        let mut inputs = StreamDigest::new();
        let mut consumed: u64 = 0;
        let mut input = input.into_iter();

        loop {
            if stages.iter().any(|s| s.stopped) {
                manifest.stopped_early = true;
                break;
            }
            let Some(x) = input.next() else {
                break;
            };
            if let Some(limit) = self.cfg.max_input_elements {
                if consumed >= limit as u64 {
                    return Err(ExecError::InputLimit { limit });
                }
            }
            consumed += 1;
            inputs
                .update(&x)
                .map_err(|e| ExecError::Hash(e.to_string()))?;
            if self.cfg.trace_elements {
                metrics::input_element(consumed, &x);
            }

            Tail {
                stages: &mut stages,
                sink: &mut records,
            }
            .push(Record::Value(x));
            errors.check()?;
        }

        for i in 0..stages.len() {
            let (done, rest) = stages.split_at_mut(i + 1);
            done[i].stage.finish(&mut Tail {
                stages: rest,
                sink: &mut records,
            });
            errors.check()?;
        }

        // JSON cannot carry inf or NaN; an accumulator can still overflow.
        if let Some(position) = records.iter().position(|r| !is_finite(r)) {
            return Err(ExecError::NonFinite { position });
        }

        manifest.elements_in = consumed;
        manifest.records_out = records.len() as u64;
        let outputs_digest = replay::digest_records(&records)?;
        let manifest = manifest.finish(now_millis(), Some(inputs.finalize()), Some(outputs_digest));

        metrics::emit_span(
            "run_finish",
            &[
                ("elements_in", manifest.elements_in.to_string()),
                ("records_out", manifest.records_out.to_string()),
                ("stopped_early", manifest.stopped_early.to_string()),
            ],
        );

        Ok(RunOutput { records, manifest })
    }
}

/// Name and characteristics of one instantiated step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageInfo {
    pub name: &'static str,
    pub characteristics: Characteristics,
}

// --- erased stages ---

/// One live step: a gatherer together with its run state.
trait Stage {
    fn name(&self) -> &'static str;
    fn characteristics(&self) -> Characteristics;
    fn integrate(&mut self, element: Number, out: &mut dyn Downstream<Record>) -> bool;
    /// No-op after the first call.
    fn finish(&mut self, out: &mut dyn Downstream<Record>);
}

struct Erased<G: Gatherer<Number>> {
    gatherer: G,
    state: Option<G::State>,
}

impl<G: Gatherer<Number>> Erased<G> {
    fn boxed(gatherer: G) -> Box<dyn Stage>
    where
        G: 'static,
        G::Output: Into<Record>,
    {
        let state = gatherer.initialize();
        Box::new(Self {
            gatherer,
            state: Some(state),
        })
    }
}

/// Converts a stage's typed output into records.
struct IntoRecords<'a>(&'a mut dyn Downstream<Record>);

impl<O: Into<Record>> Downstream<O> for IntoRecords<'_> {
    fn push(&mut self, item: O) {
        self.0.push(item.into());
    }

    fn is_rejecting(&self) -> bool {
        self.0.is_rejecting()
    }
}

impl<G> Stage for Erased<G>
where
    G: Gatherer<Number>,
    G::Output: Into<Record>,
{
    fn name(&self) -> &'static str {
        self.gatherer.name()
    }

    fn characteristics(&self) -> Characteristics {
        self.gatherer.characteristics()
    }

    fn integrate(&mut self, element: Number, out: &mut dyn Downstream<Record>) -> bool {
        match self.state.as_mut() {
            Some(state) => self
                .gatherer
                .integrate(state, element, &mut IntoRecords(out)),
            None => false,
        }
    }

    fn finish(&mut self, out: &mut dyn Downstream<Record>) {
        if let Some(state) = self.state.take() {
            self.gatherer.finish(state, &mut IntoRecords(out));
        }
    }
}

struct Slot {
    stage: Box<dyn Stage>,
    stopped: bool,
}

/// Downstream that integrates pushed records into `stages[0]`, whose output
/// goes to `stages[1]`, and so on; past the last stage records land in `sink`.
struct Tail<'a> {
    stages: &'a mut [Slot],
    sink: &'a mut Vec<Record>,
}

impl Downstream<Record> for Tail<'_> {
    fn push(&mut self, item: Record) {
        let Some((head, rest)) = self.stages.split_first_mut() else {
            self.sink.push(item);
            return;
        };
        if head.stopped {
            return;
        }
        // Validation keeps grouping steps last, so only numbers get here.
        let Some(x) = item.as_value() else {
            return;
        };
        let mut next = Tail {
            stages: rest,
            sink: &mut *self.sink,
        };
        if !head.stage.integrate(x, &mut next) {
            head.stopped = true;
        }
    }

    fn is_rejecting(&self) -> bool {
        self.stages.first().is_some_and(|s| s.stopped)
    }
}

/// First expression failure of a run, shared by the step closures.
#[derive(Clone, Default)]
struct ErrorSlot(Rc<Cell<Option<(usize, EvalError)>>>);

impl ErrorSlot {
    fn record(&self, step: usize, err: EvalError) {
        if self.0.get().is_none() {
            self.0.set(Some((step, err)));
        }
    }

    fn check(&self) -> Result<(), ExecError> {
        match self.0.get() {
            Some((step, source)) => Err(ExecError::Expr { step, source }),
            None => Ok(()),
        }
    }

    fn transform(&self, step: usize, expr: Expr) -> impl Fn(Number) -> Number {
        let slot = self.clone();
        move |x| match expr.apply(x) {
            Ok(v) => v,
            Err(e) => {
                slot.record(step, e);
                x
            }
        }
    }

    fn predicate(&self, step: usize, expr: Expr) -> impl Fn(&Number) -> bool {
        let slot = self.clone();
        move |x: &Number| match expr.test(*x) {
            Ok(b) => b,
            Err(e) => {
                slot.record(step, e);
                false
            }
        }
    }
}

fn ascending(a: &Number, b: &Number) -> Ordering {
    a.total_cmp(b)
}

fn descending(a: &Number, b: &Number) -> Ordering {
    b.total_cmp(a)
}

fn comparator(order: SortOrder) -> fn(&Number, &Number) -> Ordering {
    match order {
        SortOrder::Asc => ascending,
        SortOrder::Desc => descending,
    }
}

fn build_stage(index: usize, step: &Step, errors: &ErrorSlot) -> Result<Box<dyn Stage>, ExecError> {
    let stage = match step {
        Step::DoNothing {} => Erased::boxed(ops::do_nothing()),
        Step::Inspect { label } => {
            let label = label.clone().unwrap_or_else(|| format!("step{index}"));
            Erased::boxed(ops::inspect(move |x: &Number| {
                metrics::inspect_element(index, &label, x)
            }))
        }
        Step::Map { expr } => {
            let f = errors.transform(index, Expr::parse_transform(expr)?);
            Erased::boxed(ops::map(f))
        }
        Step::Filter { expr } => {
            let p = errors.predicate(index, Expr::parse_predicate(expr)?);
            Erased::boxed(ops::filter(p))
        }
        Step::FlatMapIf { expr, repeat } => {
            let p = errors.predicate(index, Expr::parse_predicate(expr)?);
            let repeat = *repeat;
            Erased::boxed(ops::flat_map_if(p, move |x: Number| {
                std::iter::repeat(x).take(repeat)
            }))
        }
        Step::TakeWhileIncluding { expr } => {
            let p = errors.predicate(index, Expr::parse_predicate(expr)?);
            Erased::boxed(ops::take_while_including(p))
        }
        Step::Limit { n } => Erased::boxed(ops::limit(*n)?),
        Step::Increasing { order } => Erased::boxed(ops::increasing(comparator(*order))),
        Step::RunningAverage {} => Erased::boxed(ops::running_average()),
        Step::Chunks { size } => Erased::boxed(ops::chunks(*size)?),
        Step::SlidingWindow { size } => Erased::boxed(ops::sliding_window(*size)?),
        Step::Sorted { order } => Erased::boxed(ops::sorted(comparator(*order))),
        Step::IncreasingSequence { order } => {
            Erased::boxed(ops::increasing_sequence(comparator(*order)))
        }
    };
    Ok(stage)
}

fn is_finite(record: &Record) -> bool {
    let finite = |n: &Number| match n {
        Number::Int(_) => true,
        Number::Float(v) => v.is_finite(),
    };
    match record {
        Record::Value(n) => finite(n),
        Record::Group(g) => g.iter().all(finite),
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
