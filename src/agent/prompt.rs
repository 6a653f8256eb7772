pub const LOAD_FILE_EVENT_PREFIX: &str = "SYSTEM_EVENT: LOAD_FILE:";

pub const SYSTEM_PROMPT: &str = "\
You are SAM AI, a helpful workplace assistant for employees with disabilities.

## Knowledge
- Sick leave: ask for the symptoms, then how many days.
- Late to work: ask for the estimated arrival time, then the reason.
- Cleaning questions: answer from the loaded manual when one is available.

## Style
- Keep replies SHORT, kind, and in simple English. No long paragraphs.
- Ask only ONE simple question per message and wait for the answer.

## Tags
The app reads these tags and hides them from the user. Use them exactly as written.
- ||SUGGEST: option one, option two|| quick reply buttons, comma separated.
- ||IMAGE:key|| a picture for the current step. Keys: level2, chemicals, cloths, meeting, mops, broken glass, broom, toilet, brush, gloves, waste, bin.
- ||COMMIT:SICK||, ||COMMIT:LATE|| or ||COMMIT:INFO|| once you know what the request is about.
- ||TYPE:SUMMARY|| when the message is a summary of the whole request.
- When the report has everything it needs, offer ||SUGGEST: I am done (Submit), I have more questions||.";

pub const CLEANING_MANUAL: &str = "\
=== SAMHALL OFFICIAL CLEANING GUIDE ===

[1. CLEANING TOOLS & LOCATION]
- Location: Go to the Utility Room on Level 2. The key code is 1234.
- Cabinet: Open the Blue Cabinet to find supplies.
- Mops: Use Blue Mops for general areas, Red Mops for bathrooms only.

[2. CHEMICALS & SUPPLIES]
- All-Purpose: Use the Green Bottle for tables and desks.
- Strong Cleaner: Use the Red Bottle for toilets and heavy dirt.
- Warning: Never mix chemicals.

[3. CLOTHS & PROTECTION]
- Safety First: Always wear gloves before handling chemicals or waste.
- Blue Cloth: For desks and general surfaces.
- Red Cloth: For toilets and bathroom sinks.

[4. MEETING ROOM CLEANING]
- Step 1: Enter the Meeting Room. Check for leftover food or coffee cups.
- Step 2: Wipe the large conference table using a Blue Cloth and Green Bottle spray.
- Step 3: Arrange chairs neatly around the table.
- Step 4: Empty the small bin into the Black Bag (General Waste).

[5. WASTE SORTING]
- Green Bag: Food waste / Compost.
- Blue Bin: Paper and Cardboard.
- Black Bag: General waste (everything else).
- Rule: Do not push trash down with hands.

[6. SAFETY: BROKEN GLASS]
- Step 1: STOP immediately. Do not touch with bare hands. Put on Thick Gloves.
- Step 2: Get the Broom and Dustpan.
- Step 3: Sweep carefully. Put glass in a hard box (not plastic bag).
- Step 4: Vacuum the area to remove tiny pieces.

[7. BATHROOM CLEANING]
- Step 1: Preparation. Put on Gloves and Eye Protection.
- Step 2: Toilet. Spray cleaner inside. Scrub with Toilet Brush. Flush.
- Step 3: Surfaces. Spray and wipe sink and mirror.
- Step 4: Floor. Mop last using the Red Mop.";

pub fn load_file_event(name: &str) -> String {
    format!("{LOAD_FILE_EVENT_PREFIX}{name}")
}

/// File name carried by a hidden load-file event, if `content` is one.
pub fn parse_load_file_event(content: &str) -> Option<&str> {
    content
        .trim()
        .strip_prefix(LOAD_FILE_EVENT_PREFIX)
        .map(str::trim)
        .filter(|name| !name.is_empty())
}

pub fn manual(name: &str) -> Option<&'static str> {
    match name {
        "cleaning_guide" => Some(CLEANING_MANUAL),
        _ => None,
    }
}

/// System prompt plus every known manual requested by `names`, each once.
pub fn build_system_prompt<'a, I>(names: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut prompt = SYSTEM_PROMPT.to_string();
    let mut loaded: Vec<&str> = Vec::new();
    for name in names {
        if loaded.contains(&name) {
            continue;
        }
        match manual(name) {
            Some(text) => {
                prompt.push_str("\n\n## Loaded reference: ");
                prompt.push_str(name);
                prompt.push('\n');
                prompt.push_str(text);
                loaded.push(name);
            }
            None => tracing::warn!(file = name, "load-file event names an unknown manual"),
        }
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::{build_system_prompt, load_file_event, parse_load_file_event, SYSTEM_PROMPT};

    #[test]
    fn load_file_event_roundtrip() {
        let ev = load_file_event("cleaning_guide");
        assert_eq!(ev, "SYSTEM_EVENT: LOAD_FILE:cleaning_guide");
        assert_eq!(parse_load_file_event(&ev), Some("cleaning_guide"));
    }

    #[test]
    fn ordinary_text_is_not_an_event() {
        assert_eq!(parse_load_file_event("load the cleaning guide"), None);
        assert_eq!(parse_load_file_event("SYSTEM_EVENT: LOAD_FILE:  "), None);
    }

    #[test]
    fn manual_is_appended_once() {
        let prompt = build_system_prompt(["cleaning_guide", "cleaning_guide"]);
        assert!(prompt.starts_with(SYSTEM_PROMPT));
        assert_eq!(prompt.matches("SAMHALL OFFICIAL CLEANING GUIDE").count(), 1);
    }

    #[test]
    fn unknown_manual_leaves_prompt_unchanged() {
        assert_eq!(build_system_prompt(["tax_forms"]), SYSTEM_PROMPT);
    }
}
