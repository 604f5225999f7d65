use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tempfile::tempdir;

use speech_partition::constants::partition::ALL_PARTITIONS;
use speech_partition::{
    CorpusIndex, CorpusScanner, PartitionLabel, PartitionPercentages, Partitioner, TrainingFlags,
    assign_partition, prepare_settings,
};

const WORDS: [&str; 3] = ["yes", "no", "marvin"];

fn write_clip(root: &Path, word: &str, speaker: &str, take: usize) {
    let dir = root.join(word);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(format!("{speaker}_nohash_{take}.wav")), b"RIFF").unwrap();
}

fn populate(root: &Path, speakers: usize, takes: usize) {
    for word in WORDS {
        for idx in 0..speakers {
            for take in 0..takes {
                write_clip(root, word, &format!("spk{idx:03}"), take);
            }
        }
    }
}

#[test]
fn scanned_labels_match_direct_assignment() {
    let temp = tempdir().unwrap();
    populate(temp.path(), 40, 2);
    let partitioner = Partitioner::new(PartitionPercentages::new(15.0, 15.0).unwrap()).unwrap();
    let index = CorpusIndex::scan(temp.path(), &partitioner).unwrap();

    assert_eq!(index.len(), WORDS.len() * 40 * 2);
    for sample in index.samples() {
        let path = sample.path.to_string_lossy();
        assert_eq!(sample.partition, assign_partition(&path, 15.0, 15.0));
        assert!(WORDS.contains(&sample.word.as_str()));
    }
    let total: usize = index.counts().values().sum();
    assert_eq!(total, index.len());
}

#[test]
fn a_speaker_never_straddles_partitions() {
    let temp = tempdir().unwrap();
    populate(temp.path(), 60, 3);
    let partitioner = Partitioner::new(PartitionPercentages::default()).unwrap();
    let index = CorpusIndex::scan(temp.path(), &partitioner).unwrap();

    let mut by_speaker: HashMap<&str, PartitionLabel> = HashMap::new();
    for sample in index.samples() {
        let label = *by_speaker
            .entry(sample.grouping_key.as_str())
            .or_insert(sample.partition);
        assert_eq!(label, sample.partition, "{}", sample.path.display());
    }
    for label in ALL_PARTITIONS {
        for (speaker, clips) in index.speakers(label) {
            assert_eq!(by_speaker[speaker], label);
            assert_eq!(clips.len(), WORDS.len() * 3);
        }
    }
}

#[test]
fn adding_clips_keeps_existing_assignments() {
    let temp = tempdir().unwrap();
    populate(temp.path(), 30, 1);
    let partitioner = Partitioner::new(PartitionPercentages::default()).unwrap();
    let before = CorpusIndex::scan(temp.path(), &partitioner).unwrap();

    for idx in 30..80 {
        write_clip(temp.path(), "yes", &format!("spk{idx:03}"), 0);
    }
    write_clip(temp.path(), "no", "spk000", 9);
    let after = CorpusIndex::scan(temp.path(), &partitioner).unwrap();
    assert_eq!(after.len(), before.len() + 51);

    let after_labels: HashMap<_, _> = after
        .samples()
        .iter()
        .map(|sample| (sample.path.clone(), sample.partition))
        .collect();
    for sample in before.samples() {
        assert_eq!(after_labels[&sample.path], sample.partition);
    }
}

#[test]
fn repeated_scans_are_identical() {
    let temp = tempdir().unwrap();
    populate(temp.path(), 10, 2);
    let partitioner = Partitioner::new(PartitionPercentages::default()).unwrap();
    let first = CorpusScanner::new(temp.path()).scan(&partitioner).unwrap();
    let second = CorpusScanner::new(temp.path())
        .with_follow_symlinks(true)
        .scan(&partitioner)
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn prepared_settings_drive_enrollment_selection() {
    let temp = tempdir().unwrap();
    populate(temp.path(), 20, 4);
    let flags = TrainingFlags {
        data_dir: temp.path().to_path_buf(),
        num_utt_enrollment: 3,
        batch_size: 2,
        validation_percentage: 0.0,
        testing_percentage: 0.0,
        ..TrainingFlags::default()
    };
    let prepared = prepare_settings(&flags).unwrap();
    assert_eq!(prepared.input.shape[1], 4);

    let partitioner = Partitioner::new(prepared.processor.percentages).unwrap();
    let index = CorpusIndex::scan(&prepared.processor.data_dir, &partitioner).unwrap();
    let eligible = index.enrollment_speakers(
        PartitionLabel::Training,
        prepared.processor.num_utt_enrollment,
    );
    assert_eq!(eligible.len(), 20);
    assert!(index.partition(PartitionLabel::Validation).next().is_none());
}
