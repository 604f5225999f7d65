/// Path of an audio clip as given by the caller.
/// Example: `speech_commands/yes/bobby_nohash_0.wav`
pub type SamplePath = String;
/// Deterministic key shared by related clips (base name before `_nohash_`).
/// Example: `bobby`
pub type GroupingKey = String;
/// Word label taken from the clip's parent directory.
/// Examples: `yes`, `marvin`
pub type WordLabel = String;
