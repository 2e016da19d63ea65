use super::preferences::VoiceGender;

/// A voice installed on a local engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledVoice {
    pub id: String,
    pub name: String,
    pub languages: Vec<String>,
}

const FEMALE_MARKERS: &[&str] = &["female", "zira", "helena"];
const MALE_MARKERS: &[&str] = &["male", "david", "mark"];

fn matches_language(voice: &InstalledVoice, language_tag: &str) -> bool {
    voice
        .languages
        .iter()
        .map(|lang| lang.trim().to_lowercase().replace('_', "-"))
        .any(|lang| lang == language_tag || lang.starts_with(language_tag))
}

fn matches_gender(voice: &InstalledVoice, gender: VoiceGender) -> bool {
    let label = format!("{} {}", voice.name, voice.id).to_lowercase();
    match gender {
        VoiceGender::Female => FEMALE_MARKERS.iter().any(|m| label.contains(m)),
        // "female" contains "male", so strip it before looking for male markers
        VoiceGender::Male => {
            let label = label.replace("female", "");
            MALE_MARKERS.iter().any(|m| label.contains(m))
        }
    }
}

/// Voices that can speak `language_tag`, best candidates first.
///
/// A voice qualifies when one of its declared languages equals or starts
/// with the tag. Qualifying voices whose id contains the tag are moved to
/// the front; the relative order is otherwise that of `voices`.
pub fn language_candidates<'a>(
    voices: &'a [InstalledVoice],
    language_tag: &str,
) -> Vec<&'a InstalledVoice> {
    let tag = language_tag.trim().to_lowercase();
    if tag.is_empty() {
        return Vec::new();
    }

    let (mut preferred, others): (Vec<_>, Vec<_>) = voices
        .iter()
        .filter(|voice| matches_language(voice, &tag))
        .partition(|voice| voice.id.to_lowercase().contains(&tag));

    preferred.extend(others);
    preferred
}

/// Pick a voice for the requested language and gender.
///
/// Language is mandatory: `None` means this engine cannot serve the request.
/// Gender is best effort: with no gender match the first language candidate
/// is returned.
pub fn select_voice<'a>(
    voices: &'a [InstalledVoice],
    language_tag: &str,
    gender: VoiceGender,
) -> Option<&'a InstalledVoice> {
    let candidates = language_candidates(voices, language_tag);

    let chosen = candidates
        .iter()
        .copied()
        .find(|voice| matches_gender(voice, gender));

    match chosen {
        Some(voice) => Some(voice),
        None => {
            let first = candidates.first().copied();
            if let Some(voice) = first {
                tracing::warn!(
                    language = language_tag,
                    gender = %gender,
                    voice = %voice.id,
                    "No voice matches requested gender, using first language candidate"
                );
            }
            first
        }
    }
}
