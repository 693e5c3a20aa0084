use crate::domain::model::BusinessRecord;

/// Ordered dispatch table: the first keyword set that matches the lowercased
/// category wins. Order is load-bearing for categories that match more than
/// one rule.
const PITCH_RULES: &[(&[&str], &str)] = &[
    (
        &["school", "coaching"],
        "A professional website would help you attract more students, showcase your results, and even accept online admissions. Parents today search online before choosing an institute.",
    ),
    (
        &["hospital", "clinic", "diagnostic"],
        "A website with online appointment booking would make it easier for patients to reach you, and you can share health tips and services to build trust.",
    ),
    (
        &["restaurant", "cafe", "water park", "resort", "hotel"],
        "A website with menu, photo gallery, and online table/room booking can directly increase your reservations and walk-ins.",
    ),
    (
        &["event", "banquet"],
        "A professional site showcasing your past events, packages, and an enquiry form would help you convert more clients.",
    ),
    (
        &["real estate"],
        "List your properties online with a website that includes property listings, virtual tours, and contact forms - serious buyers expect this.",
    ),
    (
        &["jewellery"],
        "An elegant website to display your collections, store hours, and contact information would build credibility and attract more customers.",
    ),
    (
        &["car showroom"],
        "A website with inventory, test drive booking, and special offers can generate high-quality leads.",
    ),
    (
        &["gym", "fitness"],
        "A site with membership plans, class schedules, and online sign-ups would help you grow your member base.",
    ),
];

const FALLBACK_PITCH: &str = "A modern website would help you establish a stronger online presence, attract more customers, and streamline operations.";

const CLOSING: &str = "\n\nI specialize in creating affordable, high-performing websites for local businesses. Would you be open to a quick chat this week?\n\nBest regards,\nYour Web Agency";

/// Build the personalized outreach message for a qualifying business.
/// Pure: no I/O, same input always yields the same message.
pub fn generate_outreach(business: &BusinessRecord) -> String {
    let category = business.category.to_lowercase();

    let mut intro = format!(
        "Hello {name},\n\nI noticed that {name} in {location} is doing well",
        name = business.name,
        location = business.location,
    );
    if let Some(reviews) = business.reviews {
        if reviews > 50 {
            intro.push_str(&format!(" with {} great reviews", reviews));
        }
    }

    let pitch = PITCH_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|kw| category.contains(kw)))
        .map(|(_, pitch)| *pitch)
        .unwrap_or(FALLBACK_PITCH);

    format!("{}. {}{}", intro, pitch, CLOSING)
}
