//! Integration tests for reverse chord lookup across the full root × quality grid.

use chordious::{
    CancellationToken, ChordQuality, ChordQualityCatalog, FinderError, InstrumentKind,
    NamedInterval, NoteName, ReverseChordFinder, ReverseChordFinderOptions,
    ReverseChordFinderResultSet, SearchStrategy, Tuning, MUTED,
};
use lazy_static::lazy_static;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use std::sync::{Arc, Mutex};

lazy_static! {
    static ref KNOWN: Arc<ChordQualityCatalog> = Arc::new(ChordQualityCatalog::known());

    /// Every (root, quality) cell of the known catalog.
    static ref GRID: Vec<(NoteName, ChordQuality)> = NoteName::ALL
        .iter()
        .flat_map(|&root| KNOWN.iter().map(move |q| (root, q.clone())))
        .collect();

    /// Many small custom shapes so a search has plenty of cells to cancel in.
    static ref WIDE: Arc<ChordQualityCatalog> = Arc::new(
        ChordQualityCatalog::new(
            (0..240u8)
                .map(|i| ChordQuality::custom(format!("Shape {i}"), format!("s{i}"), vec![0, i % 11 + 1]))
                .collect(),
        )
        .unwrap()
    );

    /// Same shapes as `WIDE`, enough of them that a search outlives a
    /// thread spawn by a wide margin.
    static ref HUGE: Arc<ChordQualityCatalog> = Arc::new(
        ChordQualityCatalog::new(
            (0..24_000u32)
                .map(|i| ChordQuality::custom(format!("Shape {i}"), format!("s{i}"), vec![0, (i % 11 + 1) as u8]))
                .collect(),
        )
        .unwrap()
    );
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// One string per interval, every string tuned to C, fretted so that the
/// sounding notes are exactly `quality` built on `root`.
fn options_for(root: NoteName, quality: &ChordQuality) -> ReverseChordFinderOptions {
    let tuning = Tuning::new("All C", vec![NoteName::C; quality.intervals().len()]).unwrap();
    let marks: Vec<i32> = quality
        .intervals()
        .iter()
        .map(|&off| root.index() as i32 + i32::from(off))
        .collect();
    ReverseChordFinderOptions::new(tuning, marks, KNOWN.clone()).unwrap()
}

fn finders() -> [ReverseChordFinder; 2] {
    [
        ReverseChordFinder::builder()
            .strategy(SearchStrategy::Sequential)
            .build(),
        ReverseChordFinder::builder()
            .strategy(SearchStrategy::Parallel)
            .build(),
    ]
}

fn is_prefix(partial: &ReverseChordFinderResultSet, full: &ReverseChordFinderResultSet) -> bool {
    full.results().starts_with(partial.results())
}

#[test]
fn every_cell_finds_itself_and_nothing_else() {
    init_logging();
    let failures = Arc::new(Mutex::new(Vec::<String>::new()));

    GRID.par_iter().for_each(|(root, quality)| {
        let options = options_for(*root, quality);
        let sounding = options.sounding_notes();

        for finder in finders() {
            let results = finder.find_chords(&options).unwrap();

            if !results.contains(*root, quality.name()) {
                failures.lock().unwrap().push(format!(
                    "{:?}: {root}{} not found",
                    finder.strategy(),
                    quality.abbreviation()
                ));
            }
            for r in results.results() {
                if r.quality().pitch_classes(r.root()) != sounding {
                    failures
                        .lock()
                        .unwrap()
                        .push(format!("{:?}: false positive {}", finder.strategy(), r.name()));
                }
            }
        }
    });

    let failures = Arc::try_unwrap(failures).unwrap().into_inner().unwrap();
    assert!(failures.is_empty(), "{} failures:\n{}", failures.len(), failures.join("\n"));
}

#[test]
fn open_ukulele_against_major_and_sixth() {
    init_logging();
    let catalog = Arc::new(
        ChordQualityCatalog::new(vec![
            ChordQuality::custom("Major", "", vec![0, 4, 7]),
            ChordQuality::custom("Major6", "6", vec![0, 4, 7, 9]),
        ])
        .unwrap(),
    );
    let options =
        ReverseChordFinderOptions::new(InstrumentKind::Ukulele, vec![0, 0, 0, 0], catalog).unwrap();

    for finder in finders() {
        let results = finder.find_chords(&options).unwrap();
        assert_eq!(results.count(), 1);
        assert_eq!(results.results()[0].root(), NoteName::C);
        assert_eq!(results.results()[0].quality().name(), "Major6");
        assert_eq!(results.options().marks(), &[0, 0, 0, 0]);
    }
}

#[test]
fn all_muted_is_empty_for_every_strategy() {
    let options =
        ReverseChordFinderOptions::new(InstrumentKind::Guitar, vec![MUTED; 6], KNOWN.clone())
            .unwrap();
    for finder in finders() {
        assert_eq!(finder.find_chords(&options).unwrap().count(), 0);
    }
}

#[test]
fn negative_marks_other_than_sentinel_also_mute() {
    let a = ReverseChordFinderOptions::new(InstrumentKind::Ukulele, vec![-7, 0, 0, 3], KNOWN.clone())
        .unwrap();
    let b = ReverseChordFinderOptions::new(InstrumentKind::Ukulele, vec![MUTED, 0, 0, 3], KNOWN.clone())
        .unwrap();
    assert_eq!(a.sounding_notes(), b.sounding_notes());
}

#[test]
fn result_sets_are_reiterable() {
    let options =
        ReverseChordFinderOptions::new(InstrumentKind::Ukulele, vec![0, 0, 0, 0], KNOWN.clone())
            .unwrap();
    let results = ReverseChordFinder::new().find_chords(&options).unwrap();
    let first: Vec<_> = results.iter().map(|r| r.name()).collect();
    let second: Vec<_> = (&results).into_iter().map(|r| r.name()).collect();
    assert_eq!(first, second);
    assert_eq!(first, vec!["C6", "Am7"]);
}

#[test]
fn strategies_agree_on_order() {
    let marks_list: [[i32; 4]; 6] = [
        [0, 0, 0, 0],
        [0, 0, 0, 3],
        [5, 3, 2, 0],
        [2, 2, 2, 0],
        [0, 2, 3, 2],
        [1, 1, 1, 1],
    ];
    let catalog = Arc::new(
        ChordQualityCatalog::new(
            KNOWN
                .iter()
                .cloned()
                .chain([ChordQuality::custom("Sixth Alias", "add6", vec![0, 4, 7, 9])])
                .collect(),
        )
        .unwrap(),
    );
    let [sequential, parallel] = finders();
    for marks in marks_list {
        let options =
            ReverseChordFinderOptions::new(InstrumentKind::Ukulele, marks, catalog.clone()).unwrap();
        let a = sequential.find_chords(&options).unwrap();
        let b = parallel.find_chords(&options).unwrap();
        assert_eq!(a.results(), b.results(), "marks {marks:?}");
    }
}

#[test]
fn missing_marks_fail_before_search() {
    let err = ReverseChordFinderOptions::builder()
        .tuning(InstrumentKind::Ukulele)
        .qualities(KNOWN.clone())
        .build()
        .unwrap_err();
    assert!(matches!(err, FinderError::InvalidArgument { arg: "marks", .. }));
    assert!(err.to_string().contains("marks"));
}

#[test]
fn cancel_before_spawn_yields_nothing() {
    let options =
        ReverseChordFinderOptions::new(InstrumentKind::Ukulele, vec![MUTED, 0, 3, MUTED], WIDE.clone())
            .unwrap();
    let finder = ReverseChordFinder::new();
    let cancel = CancellationToken::new();
    cancel.cancel();
    let partial = std::thread::scope(|s| {
        s.spawn(|| finder.find_chords_with_cancel(&options, &cancel))
            .join()
            .unwrap()
            .unwrap()
    });
    assert!(partial.is_empty());
}

#[test]
fn cancel_from_another_thread_yields_a_prefix() {
    init_logging();
    // C and G: a fifth up from C and a fourth up from G match, so hits sit
    // in the C and G rows of the grid with nothing after G.
    let options =
        ReverseChordFinderOptions::new(InstrumentKind::Ukulele, vec![MUTED, 0, 3, MUTED], HUGE.clone())
            .unwrap();
    let finder = ReverseChordFinder::new();
    let full = finder.find_chords(&options).unwrap();
    assert!(!full.is_empty());

    let mut cut_short = None;
    for delay_ms in 0..40u64 {
        let cancel = CancellationToken::new();
        let partial = std::thread::scope(|s| {
            let worker = s.spawn(|| finder.find_chords_with_cancel(&options, &cancel));
            std::thread::sleep(std::time::Duration::from_millis(delay_ms));
            cancel.cancel();
            worker.join().unwrap().unwrap()
        });
        assert!(is_prefix(&partial, &full), "not a prefix after {delay_ms}ms");
        if !partial.is_empty() && partial.count() < full.count() {
            cut_short = Some(partial.count());
            break;
        }
    }
    let count = cut_short.expect("cancellation never landed mid-search");
    assert!(count > 0 && count < full.count());
}

#[test]
fn parallel_cancel_yields_a_subset() {
    let options =
        ReverseChordFinderOptions::new(InstrumentKind::Ukulele, vec![MUTED, 0, 3, MUTED], WIDE.clone())
            .unwrap();
    let finder = ReverseChordFinder::builder()
        .strategy(SearchStrategy::Parallel)
        .build();
    let full = finder.find_chords(&options).unwrap();

    let cancel = CancellationToken::new();
    let partial = std::thread::scope(|s| {
        let worker = s.spawn(|| finder.find_chords_with_cancel(&options, &cancel));
        cancel.cancel();
        worker.join().unwrap().unwrap()
    });
    for r in partial.results() {
        assert!(full.results().contains(r), "{} not in full result", r.name());
    }
}

#[test]
fn json_catalog_with_octave_offsets_reverses() {
    init_logging();
    let catalog = Arc::new(
        ChordQualityCatalog::from_json_str(
            r#"[
                "Major",
                {"name": "Spread Major", "abbreviation": "sp", "intervals": [0, 12, 4, 16, 7]},
                {"name": "Spread Sixth", "abbreviation": "sp6", "intervals": [0, 16, 9, 19, 24]}
            ]"#,
        )
        .unwrap(),
    );
    assert_eq!(catalog.get("sp").map(|q| q.intervals().len()), Some(5));

    // G C E C
    let options =
        ReverseChordFinderOptions::new(InstrumentKind::Ukulele, vec![0, 0, 0, 3], catalog.clone())
            .unwrap();
    for finder in finders() {
        let results = finder.find_chords(&options).unwrap();
        let names: Vec<_> = results.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["C", "Csp"], "{:?}", finder.strategy());
        assert_eq!(results.results()[1].catalog_index(), 1);
    }

    // G C E A
    let options =
        ReverseChordFinderOptions::new(InstrumentKind::Ukulele, vec![0, 0, 0, 0], catalog).unwrap();
    for finder in finders() {
        let results = finder.find_chords(&options).unwrap();
        assert!(results.contains(NoteName::C, "spread sixth"));
        assert_eq!(results.count(), 1);
    }
}

#[tokio::test]
async fn async_matches_sync() {
    init_logging();
    let options =
        ReverseChordFinderOptions::new(InstrumentKind::Ukulele, vec![5, 3, 2, 0], KNOWN.clone())
            .unwrap();
    for finder in finders() {
        let sync = finder.find_chords(&options).unwrap();
        let asynchronous = finder
            .find_chords_async(options.clone(), CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(sync.results(), asynchronous.results());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn async_parallel_runs_on_multi_thread_runtime() {
    let options =
        ReverseChordFinderOptions::new(InstrumentKind::Guitar, vec![MUTED, 3, 2, 0, 1, 0], KNOWN.clone())
            .unwrap();
    let finder = ReverseChordFinder::builder()
        .strategy(SearchStrategy::Parallel)
        .build();
    let results = finder
        .find_chords_async(options, CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(results.iter().map(|r| r.name()).collect::<Vec<_>>(), vec!["C"]);
}

#[tokio::test]
async fn async_cancel_before_start_is_empty() {
    let options =
        ReverseChordFinderOptions::new(InstrumentKind::Ukulele, vec![0, 0, 0, 0], KNOWN.clone())
            .unwrap();
    let cancel = CancellationToken::new();
    cancel.cancel();
    for finder in finders() {
        let results = finder
            .find_chords_async(options.clone(), cancel.clone())
            .await
            .unwrap();
        assert_eq!(results.count(), 0);
    }
}

#[tokio::test]
async fn async_cancel_mid_search_keeps_a_prefix() {
    let options =
        ReverseChordFinderOptions::new(InstrumentKind::Ukulele, vec![MUTED, 0, 3, MUTED], WIDE.clone())
            .unwrap();
    let finder = ReverseChordFinder::new();
    let full = finder.find_chords(&options).unwrap();

    let cancel = CancellationToken::new();
    let task = {
        let finder = finder.clone();
        let options = options.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move { finder.find_chords_async(options, cancel).await })
    };

    // The single-threaded test runtime only advances the search while we yield.
    for _ in 0..(2 * WIDE.len()) {
        tokio::task::yield_now().await;
    }
    cancel.cancel();

    let partial = task.await.unwrap().unwrap();
    assert!(partial.count() < full.count());
    assert!(is_prefix(&partial, &full));
}
