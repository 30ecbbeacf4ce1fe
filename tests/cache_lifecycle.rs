use std::collections::BTreeSet;
use std::fs;

use studyguide_core::cache::{CacheConfig, ContentCache};
use studyguide_core::types::{AnalysisRecord, CandidateRef, Digest, QuestionItem};
use tempfile::tempdir;

fn short_answer(prompt: &str) -> QuestionItem {
    QuestionItem::ShortAnswer {
        prompt: prompt.to_string(),
        answer: "answer".to_string(),
    }
}

fn make_record() -> AnalysisRecord {
    let mut record = AnalysisRecord::new();
    record.intro_summary = Some("Cell biology, part one.".into());
    record.questions.insert(
        4,
        vec![
            QuestionItem::placeholder("Why do cells divide?"),
            short_answer("What does ATP stand for?"),
        ],
    );
    record.questions.insert(12, vec![short_answer("Define osmosis")]);
    record
}

#[test]
fn document_roundtrip_returns_equal_record() {
    let dir = tempdir().unwrap();
    let cache = ContentCache::open(dir.path().join("cache"), CacheConfig::v0()).unwrap();

    let digest = Digest::of_bytes(b"deck.pdf bytes");
    let record = make_record();
    cache.store_document(&digest, &record).unwrap();

    assert_eq!(cache.lookup_document(&digest), Some(record));
    assert_eq!(cache.lookup_document(&Digest::of_bytes(b"never stored")), None);
}

#[test]
fn document_roundtrip_survives_reopen() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("cache");
    let digest = Digest::of_bytes(b"deck");
    let record = make_record();

    {
        let cache = ContentCache::open(&root, CacheConfig::v0()).unwrap();
        cache.store_document(&digest, &record).unwrap();
    }

    let reopened = ContentCache::open(&root, CacheConfig::v0()).unwrap();
    assert_eq!(reopened.lookup_document(&digest), Some(record));
}

#[test]
fn selection_is_stored_with_the_document() {
    let dir = tempdir().unwrap();
    let cache = ContentCache::open(dir.path(), CacheConfig::v0()).unwrap();

    let digest = Digest::of_bytes(b"deck");
    let selected: BTreeSet<CandidateRef> =
        [CandidateRef::new(4, 1), CandidateRef::new(12, 0)].into_iter().collect();
    cache
        .store_document_with_selection(&digest, &make_record(), &selected)
        .unwrap();

    let entry = cache.lookup_document_entry(&digest).unwrap();
    assert_eq!(entry.record, make_record());
    assert_eq!(
        entry.selected,
        Some(vec![CandidateRef::new(4, 1), CandidateRef::new(12, 0)])
    );

    cache.store_document(&digest, &make_record()).unwrap();
    assert_eq!(cache.lookup_document_entry(&digest).unwrap().selected, None);
}

#[test]
fn checkpoint_stores_degraded_slides() {
    let dir = tempdir().unwrap();
    let cache = ContentCache::open(dir.path(), CacheConfig::v0()).unwrap();

    let digest = Digest::of_bytes(b"deck");
    let selected: BTreeSet<CandidateRef> = [CandidateRef::new(4, 0)].into_iter().collect();
    let degraded: BTreeSet<u32> = [12].into_iter().collect();
    cache
        .store_checkpoint(&digest, &make_record(), &selected, &degraded)
        .unwrap();

    let entry = cache.lookup_document_entry(&digest).unwrap();
    assert_eq!(entry.selected, Some(vec![CandidateRef::new(4, 0)]));
    assert_eq!(entry.degraded, vec![12]);

    cache.store_document(&digest, &make_record()).unwrap();
    assert!(cache.lookup_document_entry(&digest).unwrap().degraded.is_empty());
}

#[test]
fn slide_tier_roundtrip_and_miss() {
    let dir = tempdir().unwrap();
    let cache = ContentCache::open(dir.path(), CacheConfig::v0()).unwrap();

    let digest = ContentCache::slide_digest(&[255, 0, 0, 255, 0, 0]);
    let questions = vec![short_answer("Define mitosis")];
    cache.store_slide(&digest, &questions).unwrap();

    assert_eq!(cache.lookup_slide(&digest), Some(questions));
    assert_eq!(cache.lookup_slide(&ContentCache::slide_digest(&[0, 0, 255])), None);
}

#[test]
fn empty_slide_list_counts_as_miss() {
    let dir = tempdir().unwrap();
    let cache = ContentCache::open(dir.path(), CacheConfig::v0()).unwrap();

    let digest = ContentCache::slide_digest(b"pixels");
    cache.store_slide(&digest, &[]).unwrap();
    assert_eq!(cache.lookup_slide(&digest), None);
}

#[test]
fn tiers_are_independent_files() {
    let dir = tempdir().unwrap();
    let cache = ContentCache::open(dir.path(), CacheConfig::v0()).unwrap();

    let digest = Digest::of_bytes(b"same key in both tiers");
    cache.store_document(&digest, &make_record()).unwrap();
    cache.store_slide(&digest, &[short_answer("x")]).unwrap();

    assert!(dir.path().join("documents.json").exists());
    assert!(dir.path().join("slides.json").exists());
    assert_eq!(cache.document_count(), 1);
    assert_eq!(cache.slide_count(), 1);
}

#[test]
fn invalidate_all_clears_both_tiers() {
    let dir = tempdir().unwrap();
    let cache = ContentCache::open(dir.path(), CacheConfig::v0()).unwrap();

    let doc = Digest::of_bytes(b"deck");
    let slide = ContentCache::slide_digest(b"pixels");
    cache.store_document(&doc, &make_record()).unwrap();
    cache.store_slide(&slide, &[short_answer("x")]).unwrap();

    cache.invalidate_all().unwrap();

    assert_eq!(cache.lookup_document(&doc), None);
    assert_eq!(cache.lookup_slide(&slide), None);
    assert_eq!(cache.document_count(), 0);

    // Still usable afterwards.
    cache.store_slide(&slide, &[short_answer("y")]).unwrap();
    assert_eq!(cache.slide_count(), 1);
}

#[test]
fn invalidate_all_on_fresh_cache_is_ok() {
    let dir = tempdir().unwrap();
    let cache = ContentCache::open(dir.path().join("fresh"), CacheConfig::v0()).unwrap();
    cache.invalidate_all().unwrap();
}

#[test]
fn later_store_overwrites_earlier() {
    let dir = tempdir().unwrap();
    let cache = ContentCache::open(dir.path(), CacheConfig::v0()).unwrap();

    let digest = ContentCache::slide_digest(b"pixels");
    cache.store_slide(&digest, &[short_answer("first")]).unwrap();
    cache.store_slide(&digest, &[short_answer("second")]).unwrap();

    assert_eq!(cache.lookup_slide(&digest), Some(vec![short_answer("second")]));
    assert_eq!(cache.slide_count(), 1);
}

#[test]
fn config_change_drops_existing_tiers() {
    let dir = tempdir().unwrap();
    let digest = Digest::of_bytes(b"deck");

    let cache = ContentCache::open(dir.path(), CacheConfig::v0()).unwrap();
    cache.store_document(&digest, &make_record()).unwrap();
    drop(cache);

    let mut config = CacheConfig::v0();
    config.version = "2".into();
    let cache = ContentCache::open(dir.path(), config.clone()).unwrap();
    assert_eq!(cache.lookup_document(&digest), None);

    let persisted: CacheConfig =
        serde_json::from_slice(&fs::read(dir.path().join("cache_config.json")).unwrap()).unwrap();
    assert_eq!(persisted, config);
}
