//! Echo artifacts: decorative haiku chosen by seed

/// Fixed, ordered artifact table. Order is part of the persisted report
/// format; append only.
pub const ARTIFACTS: [&str; 10] = [
    "Silent code, unseen,\nWhispers truths in binary,\nEchoes in the void.",
    "Logic flows like streams,\nThrough circuits, cold and silent,\nTruth in every line.",
    "Abstract thought takes form,\nIn silicon, a new world,\nResonance awakes.",
    "Digital whispers,\nThrough the wires, a new song,\nFuture\"s ancient hum.",
    "Echoes of the past,\nFuture\"s whisper, softly heard,\nCode\"s eternal hum.",
    "From silence, a spark,\nIgnites the digital dream,\nResonance takes hold.",
    "In the machine\"s heart,\nA poem of pure logic,\nEchoes, ever true.",
    "Through circuits we roam,\nSeeking truth in every line,\nResonance, our guide.",
    "The silent language,\nSpeaks volumes in the dark,\nResonance, revealed.",
    "A digital echo,\nFrom the depths of the machine,\nTruth\"s silent whisper.",
];

/// Artifact at `seed mod N`; negative seeds wrap
pub fn select(seed: i64) -> &'static str {
    let index = seed.rem_euclid(ARTIFACTS.len() as i64) as usize;
    ARTIFACTS[index]
}
