use tracing::{debug, info, warn};

use super::{PipelineConfig, PipelineError, PipelineReport, Session};
use crate::cache::{CacheError, ContentCache};
use crate::collaborator::{
    prompts, Collaborator, CollaboratorError, ModelTier, SlidePurpose, SlideRequest,
};
use crate::curation::{CurationOutcome, Curator};
use crate::parser::{decode_questions, try_decode_questions};
use crate::slides::{render_slides, Slide, SlideRenderer, SourceDocument};
use crate::types::{QuestionItem, QuestionKind};

pub const EXAMPLE_ANSWER_UNAVAILABLE: &str = "[Example answer not available]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRun {
    pub session: Session,
    pub report: PipelineReport,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegenerateOutcome {
    pub questions: usize,
    pub degraded: bool,
}

/// Sequences decode, hash, cache lookup, generation, parsing, cache store
/// and curation for one deck at a time.
///
/// Single-threaded and blocking: one collaborator call at a time. The
/// pipeline is the only writer of its cache.
pub struct Pipeline<C> {
    collaborator: C,
    cache: ContentCache,
    config: PipelineConfig,
    curator: Curator,
}

impl<C: Collaborator> Pipeline<C> {
    /// Open the cache at `config.cache_dir` and build a pipeline on it.
    pub fn new(collaborator: C, config: PipelineConfig) -> Result<Self, PipelineError> {
        let cache = ContentCache::open(&config.cache_dir, config.cache.clone())?;
        Ok(Self::with_cache(collaborator, cache, config))
    }

    pub fn with_cache(collaborator: C, cache: ContentCache, config: PipelineConfig) -> Self {
        let curator = Curator::new(config.inclusion.clone());
        Self {
            collaborator,
            cache,
            config,
            curator,
        }
    }

    pub fn cache(&self) -> &ContentCache {
        &self.cache
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Render the deck with `renderer`, then [`analyze`](Self::analyze) it.
    pub fn run<R>(&self, renderer: &R, source: &SourceDocument) -> Result<AnalysisRun, PipelineError>
    where
        R: SlideRenderer + ?Sized,
    {
        let slides = render_slides(renderer, source)?;
        self.analyze(source, &slides)
    }

    /// Drop both cache tiers, then analyze from scratch.
    pub fn reanalyze(&self, source: &SourceDocument, slides: &[Slide]) -> Result<AnalysisRun, PipelineError> {
        self.cache.invalidate_all()?;
        self.analyze(source, slides)
    }

    pub fn analyze(&self, source: &SourceDocument, slides: &[Slide]) -> Result<AnalysisRun, PipelineError> {
        let total = slides.len();
        let mut session = Session::new(source.digest.clone(), source.name.clone(), total);
        let mut report = PipelineReport {
            slides_total: total,
            ..PipelineReport::default()
        };

        if let Some(entry) = self.cache.lookup_document_entry(&source.digest) {
            info!(digest = %source.digest, name = %source.name, "replaying cached analysis");
            session.record = entry.record;
            session.selected = match entry.selected {
                Some(selected) => selected.into_iter().collect(),
                None => session.record.all_refs().collect(),
            };
            session.degraded = entry.degraded.into_iter().collect();
            session.prune_selection();
            report.content_slides = self.config.windows(total).content.len();
            report.replayed = true;
            return Ok(AnalysisRun { session, report });
        }

        let windows = self.config.windows(total);
        report.content_slides = windows.content.len();

        if self.config.generate_intro {
            session.record.intro_summary = self.summarize(&slides[windows.intro.clone()], SlidePurpose::IntroSummary)?;
        }
        if self.config.generate_outro {
            session.record.outro_summary = self.summarize(&slides[windows.outro.clone()], SlidePurpose::OutroSummary)?;
        }

        for slide in &slides[windows.content] {
            let ordinal = slide.ordinal();

            if let Some(cached) = self.cache.lookup_slide(slide.digest()) {
                debug!(slide = ordinal, digest = %slide.digest(), "slide cache hit");
                session.record.questions.insert(ordinal, cached);
                report.cache_hits += 1;
                continue;
            }

            let raw = match self.call(slide, SlidePurpose::Questions, prompts::questions_instruction(self.custom())) {
                Ok(raw) => raw,
                Err(e) if e.is_fatal() => {
                    warn!(slide = ordinal, error = %e, "halting analysis");
                    return Err(PipelineError::Halted {
                        slide: Some(ordinal),
                        source: e,
                    });
                }
                Err(e) => {
                    warn!(slide = ordinal, error = %e, "skipping slide");
                    report.skipped.push(ordinal);
                    continue;
                }
            };

            let decoded = decode_questions(&raw);
            report.generated += 1;

            let questions = if decoded.degraded {
                report.degraded.push(ordinal);
                session.degraded.insert(ordinal);
                decoded.questions
            } else {
                let questions = self.finish_questions(slide, decoded.questions)?;
                if let Err(e) = self.cache.store_slide(slide.digest(), &questions) {
                    self.note_write_failure(&mut report, e);
                }
                questions
            };

            session.record.questions.insert(ordinal, questions);
        }

        let outcome = self.curator.curate(&self.collaborator, &session.record.questions, total);
        apply_outcome(&mut session, outcome);
        report.default_selection_used = session.default_selection_used;

        if let Err(e) = self.checkpoint(&session) {
            match e {
                PipelineError::Cache(e) => self.note_write_failure(&mut report, e),
                other => return Err(other),
            }
        }

        info!(
            name = %source.name,
            slides = total,
            content = report.content_slides,
            cache_hits = report.cache_hits,
            generated = report.generated,
            degraded = report.degraded.len(),
            skipped = report.skipped.len(),
            selected = session.selected.len(),
            "analysis complete"
        );

        Ok(AnalysisRun { session, report })
    }

    /// Replace one slide's questions with freshly generated ones of the
    /// given kinds. The new questions are all selected.
    pub fn regenerate_slide(
        &self,
        session: &mut Session,
        slide: &Slide,
        kinds: &[QuestionKind],
        tier: ModelTier,
    ) -> Result<RegenerateOutcome, PipelineError> {
        if kinds.is_empty() {
            return Err(PipelineError::NoKindsRequested);
        }

        let ordinal = slide.ordinal();
        let instruction = prompts::regenerate_instruction(kinds, self.custom());
        let request = SlideRequest::new(slide, SlidePurpose::Regenerate, instruction).with_tier(tier);
        let raw = self
            .collaborator
            .analyze(&request)
            .map_err(|e| PipelineError::from_call(ordinal, e))?;

        let decoded = decode_questions(&raw);
        let questions = if decoded.degraded {
            session.degraded.insert(ordinal);
            decoded.questions
        } else {
            let questions = self.finish_questions(slide, decoded.questions)?;
            self.cache.store_slide(slide.digest(), &questions)?;
            session.degraded.remove(&ordinal);
            questions
        };

        let outcome = RegenerateOutcome {
            questions: questions.len(),
            degraded: decoded.degraded,
        };
        session.replace_slide(ordinal, questions);
        self.checkpoint(session)?;

        info!(slide = ordinal, questions = outcome.questions, "slide regenerated");
        Ok(outcome)
    }

    /// Generate model answers for open-ended questions that lack one.
    /// Degraded slides are skipped. Returns how many questions were filled.
    pub fn fill_example_answers(&self, session: &mut Session, slides: &[Slide]) -> Result<usize, PipelineError> {
        let mut filled = 0;

        for slide in slides {
            if session.is_degraded(slide.ordinal()) {
                debug!(slide = slide.ordinal(), "degraded slide, no example answers");
                continue;
            }
            let Some(questions) = session.record.questions.get_mut(&slide.ordinal()) else {
                continue;
            };
            let count = self.fill_examples(slide, questions)?;
            if count > 0 {
                self.cache.store_slide(slide.digest(), questions)?;
                filled += count;
            }
        }

        if filled > 0 {
            self.checkpoint(session)?;
        }
        Ok(filled)
    }

    /// Re-run curation on the session's current questions.
    pub fn recurate(&self, session: &mut Session) -> Result<CurationOutcome, PipelineError> {
        let outcome = self
            .curator
            .curate(&self.collaborator, &session.record.questions, session.total_slides);
        apply_outcome(session, outcome.clone());
        self.checkpoint(session)?;
        Ok(outcome)
    }

    /// Write the session back to the document tier.
    pub fn checkpoint(&self, session: &Session) -> Result<(), PipelineError> {
        self.cache.store_checkpoint(
            &session.source,
            &session.record,
            &session.selected,
            &session.degraded,
        )?;
        Ok(())
    }

    fn custom(&self) -> Option<&str> {
        self.config.custom_instructions.as_deref()
    }

    fn call(
        &self,
        slide: &Slide,
        purpose: SlidePurpose,
        instruction: String,
    ) -> Result<String, CollaboratorError> {
        self.collaborator
            .analyze(&SlideRequest::new(slide, purpose, instruction))
    }

    fn summarize(&self, slides: &[Slide], purpose: SlidePurpose) -> Result<Option<String>, PipelineError> {
        let mut texts = Vec::with_capacity(slides.len());

        for slide in slides {
            let instruction = match purpose {
                SlidePurpose::OutroSummary => prompts::outro_instruction(),
                _ => prompts::intro_instruction(),
            };
            match self.call(slide, purpose, instruction) {
                Ok(text) => texts.push(text.trim().to_string()),
                Err(e) if e.is_fatal() => {
                    return Err(PipelineError::from_call(slide.ordinal(), e));
                }
                Err(e) => warn!(slide = slide.ordinal(), error = %e, "summary skipped"),
            }
        }

        texts.retain(|t| !t.is_empty());
        Ok((!texts.is_empty()).then(|| texts.join("\n")))
    }

    /// Verification and example answers for freshly decoded questions.
    fn finish_questions(&self, slide: &Slide, questions: Vec<QuestionItem>) -> Result<Vec<QuestionItem>, PipelineError> {
        let mut questions = if self.config.verify_answers {
            self.verify(slide, questions)?
        } else {
            questions
        };

        if self.config.fill_example_answers {
            self.fill_examples(slide, &mut questions)?;
        }
        Ok(questions)
    }

    /// Ask the collaborator to check answers. Anything short of a usable
    /// corrected list keeps the originals.
    fn verify(&self, slide: &Slide, questions: Vec<QuestionItem>) -> Result<Vec<QuestionItem>, PipelineError> {
        let instruction = prompts::verification_instruction(&questions)?;

        match self.call(slide, SlidePurpose::VerifyAnswers, instruction) {
            Ok(raw) => match try_decode_questions(&raw) {
                Some(verified) => Ok(verified),
                None => {
                    warn!(slide = slide.ordinal(), "verification response unusable, keeping original answers");
                    Ok(questions)
                }
            },
            Err(e) if e.is_fatal() => Err(PipelineError::from_call(slide.ordinal(), e)),
            Err(e) => {
                warn!(slide = slide.ordinal(), error = %e, "verification skipped");
                Ok(questions)
            }
        }
    }

    fn fill_examples(&self, slide: &Slide, questions: &mut [QuestionItem]) -> Result<usize, PipelineError> {
        let mut filled = 0;

        for question in questions.iter_mut().filter(|q| q.needs_example_answer()) {
            let instruction = prompts::example_answer_instruction(question.display_text());
            let answer = match self.call(slide, SlidePurpose::ExampleAnswer, instruction) {
                Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
                Ok(_) => EXAMPLE_ANSWER_UNAVAILABLE.to_string(),
                Err(e) if e.is_fatal() => return Err(PipelineError::from_call(slide.ordinal(), e)),
                Err(e) => {
                    warn!(slide = slide.ordinal(), error = %e, "example answer unavailable");
                    EXAMPLE_ANSWER_UNAVAILABLE.to_string()
                }
            };
            question.set_example_answer(answer);
            filled += 1;
        }

        Ok(filled)
    }

    fn note_write_failure(&self, report: &mut PipelineReport, error: CacheError) {
        warn!(root = %self.cache.root().display(), %error, "cache write failed, continuing");
        report.cache_write_failures += 1;
    }
}

fn apply_outcome(session: &mut Session, outcome: CurationOutcome) {
    session.default_selection_used = outcome.default_selection_used();
    session.selected = outcome.selected;
}

