use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::constants::corpus::{AUDIO_EXTENSION, BACKGROUND_NOISE_DIR};
use crate::constants::partition::ALL_PARTITIONS;
use crate::errors::PartitionError;
use crate::hash::BucketHasher;
use crate::splits::{PartitionLabel, Partitioner, grouping_key};
use crate::types::{GroupingKey, WordLabel};

/// One indexed clip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorpusSample {
    /// Full path of the clip.
    pub path: PathBuf,
    /// Word label (parent directory name).
    pub word: WordLabel,
    /// Speaker/grouping key derived from the file name.
    pub grouping_key: GroupingKey,
    /// Assigned partition.
    pub partition: PartitionLabel,
}

/// Filesystem scanner for `<root>/<word>/<speaker>_nohash_<n>.wav` layouts.
pub struct CorpusScanner {
    root: PathBuf,
    follow_links: bool,
}

impl CorpusScanner {
    /// Create a scanner rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            follow_links: false,
        }
    }

    /// Configure symlink traversal.
    pub fn with_follow_symlinks(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    /// Walk the root and partition every clip with `partitioner`.
    ///
    /// Background-noise clips and files sitting directly under the root are
    /// skipped. Samples are ordered by path so repeated scans compare equal.
    pub fn scan<H: BucketHasher>(
        &self,
        partitioner: &Partitioner<H>,
    ) -> Result<CorpusIndex, PartitionError> {
        if !self.root.is_dir() {
            return Err(PartitionError::Corpus {
                root: self.root.display().to_string(),
                reason: "not a directory".to_string(),
            });
        }
        let mut walker = WalkDir::new(&self.root);
        if self.follow_links {
            walker = walker.follow_links(true);
        }
        let mut samples = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(
                        root = %self.root.display(),
                        error = %err,
                        "skipping unreadable corpus entry"
                    );
                    continue;
                }
            };
            if !entry.file_type().is_file() || !is_audio_file(entry.path()) {
                continue;
            }
            let Some(word) = word_label(&self.root, entry.path()) else {
                debug!(path = %entry.path().display(), "skipping clip outside a word directory");
                continue;
            };
            // Lossy decoding would collapse distinct names onto U+FFFD.
            let Some(file_name) = entry.file_name().to_str() else {
                warn!(
                    path = %entry.path().display(),
                    "skipping clip whose file name is not valid UTF-8"
                );
                continue;
            };
            samples.push(CorpusSample {
                grouping_key: grouping_key(file_name).to_string(),
                partition: partitioner.label_for(file_name),
                path: entry.path().to_path_buf(),
                word,
            });
        }
        samples.sort_by(|a, b| a.path.cmp(&b.path));
        let index = CorpusIndex {
            root: self.root.clone(),
            samples,
        };
        info!(
            root = %index.root.display(),
            clips = index.len(),
            "indexed corpus"
        );
        Ok(index)
    }
}

/// Partitioned view of a scanned dataset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorpusIndex {
    root: PathBuf,
    samples: Vec<CorpusSample>,
}

impl CorpusIndex {
    /// Scan `root` with default scanner settings.
    pub fn scan<H: BucketHasher>(
        root: impl Into<PathBuf>,
        partitioner: &Partitioner<H>,
    ) -> Result<Self, PartitionError> {
        CorpusScanner::new(root).scan(partitioner)
    }

    /// Root the index was built from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All clips, ordered by path.
    pub fn samples(&self) -> &[CorpusSample] {
        &self.samples
    }

    /// Number of indexed clips.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when no clips were indexed.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Clips assigned to `label`.
    pub fn partition(&self, label: PartitionLabel) -> impl Iterator<Item = &CorpusSample> {
        self.samples
            .iter()
            .filter(move |sample| sample.partition == label)
    }

    /// Clip counts per partition; every label is present, possibly with zero.
    pub fn counts(&self) -> BTreeMap<PartitionLabel, usize> {
        let mut counts: BTreeMap<PartitionLabel, usize> =
            ALL_PARTITIONS.iter().map(|label| (*label, 0)).collect();
        for sample in &self.samples {
            *counts.entry(sample.partition).or_insert(0) += 1;
        }
        counts
    }

    /// Clips in `label` grouped by grouping key.
    pub fn speakers(&self, label: PartitionLabel) -> BTreeMap<&str, Vec<&CorpusSample>> {
        let mut speakers: BTreeMap<&str, Vec<&CorpusSample>> = BTreeMap::new();
        for sample in self.partition(label) {
            speakers
                .entry(sample.grouping_key.as_str())
                .or_default()
                .push(sample);
        }
        speakers
    }

    /// Speakers in `label` with enough clips for one evaluation utterance plus
    /// `num_utt_enrollment` enrollment utterances.
    pub fn enrollment_speakers(
        &self,
        label: PartitionLabel,
        num_utt_enrollment: usize,
    ) -> Vec<&str> {
        let needed = num_utt_enrollment.saturating_add(1);
        self.speakers(label)
            .into_iter()
            .filter(|(_, clips)| clips.len() >= needed)
            .map(|(speaker, _)| speaker)
            .collect()
    }
}

/// True if the path has a `.wav` extension (case-insensitive).
pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(AUDIO_EXTENSION))
        .unwrap_or(false)
}

fn word_label(root: &Path, path: &Path) -> Option<WordLabel> {
    let relative = path.strip_prefix(root).ok()?;
    if relative
        .components()
        .any(|component| component.as_os_str() == BACKGROUND_NOISE_DIR)
    {
        return None;
    }
    let parent = relative.parent()?;
    if parent.as_os_str().is_empty() {
        return None;
    }
    parent
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::splits::PartitionPercentages;
    use std::fs;
    use tempfile::tempdir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"RIFF").unwrap();
    }

    #[test]
    fn audio_extension_check_ignores_case() {
        assert!(is_audio_file(Path::new("yes/a.wav")));
        assert!(is_audio_file(Path::new("yes/a.WAV")));
        assert!(!is_audio_file(Path::new("yes/a.txt")));
        assert!(!is_audio_file(Path::new("yes/wav")));
    }

    #[test]
    fn word_label_requires_word_directory() {
        let root = Path::new("/data");
        assert_eq!(
            word_label(root, Path::new("/data/yes/bob_nohash_0.wav")).as_deref(),
            Some("yes")
        );
        assert_eq!(word_label(root, Path::new("/data/loose.wav")), None);
        assert_eq!(
            word_label(root, Path::new("/data/_background_noise_/hum.wav")),
            None
        );
    }

    #[test]
    fn scan_skips_noise_and_non_audio_files() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        touch(root, "yes/bobby_nohash_0.wav");
        touch(root, "no/bobby_nohash_1.wav");
        touch(root, "no/README.txt");
        touch(root, "_background_noise_/white.wav");
        touch(root, "stray.wav");

        let partitioner = Partitioner::new(PartitionPercentages::default()).unwrap();
        let index = CorpusIndex::scan(root, &partitioner).unwrap();
        assert_eq!(index.len(), 2);
        let words: Vec<&str> = index.samples().iter().map(|s| s.word.as_str()).collect();
        assert_eq!(words, vec!["no", "yes"]);
        assert!(index.samples().iter().all(|s| s.grouping_key == "bobby"));
    }

    #[test]
    fn missing_root_is_a_corpus_error() {
        let temp = tempdir().unwrap();
        let partitioner = Partitioner::new(PartitionPercentages::default()).unwrap();
        let result = CorpusIndex::scan(temp.path().join("absent"), &partitioner);
        assert!(matches!(result, Err(PartitionError::Corpus { .. })));
    }

    #[test]
    fn enrollment_speakers_need_enough_clips() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        for n in 0..3 {
            touch(root, &format!("yes/alice_nohash_{n}.wav"));
        }
        touch(root, "yes/bob_nohash_0.wav");

        // Everything lands in training with zero holdout.
        let partitioner = Partitioner::new(PartitionPercentages::new(0.0, 0.0).unwrap()).unwrap();
        let index = CorpusIndex::scan(root, &partitioner).unwrap();
        assert_eq!(index.counts()[&PartitionLabel::Training], 4);
        assert_eq!(index.counts()[&PartitionLabel::Testing], 0);
        assert_eq!(index.speakers(PartitionLabel::Training).len(), 2);
        assert_eq!(
            index.enrollment_speakers(PartitionLabel::Training, 2),
            vec!["alice"]
        );
        assert_eq!(
            index.enrollment_speakers(PartitionLabel::Training, 0),
            vec!["alice", "bob"]
        );
        assert!(index.enrollment_speakers(PartitionLabel::Validation, 0).is_empty());
        assert!(
            index
                .enrollment_speakers(PartitionLabel::Training, usize::MAX)
                .is_empty()
        );
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_file_names_are_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp = tempdir().unwrap();
        let root = temp.path();
        touch(root, "yes/alice_nohash_0.wav");
        let word_dir = root.join("yes");
        for raw in [&b"\xffa_nohash_0.wav"[..], &b"\xfeb_nohash_0.wav"[..]] {
            let path = word_dir.join(OsStr::from_bytes(raw));
            if fs::write(&path, b"RIFF").is_err() {
                // Some filesystems refuse non-UTF-8 names outright.
                return;
            }
        }

        let partitioner = Partitioner::new(PartitionPercentages::default()).unwrap();
        let index = CorpusIndex::scan(root, &partitioner).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.samples()[0].grouping_key, "alice");
    }
}
