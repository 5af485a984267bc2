use portal_core::model::Profile;

/// Free-text sections a migrant fills in to generate a CV.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResumeSections {
    pub summary: String,
    pub skills: String,
    pub experience: String,
    pub education: String,
}

/// Render a plain-text CV: contact lines from the profile, then each section
/// under its heading. Empty sections keep their heading.
#[must_use]
pub fn render_resume_text(profile: &Profile, sections: &ResumeSections) -> String {
    format!(
        "Name: {name}\nEmail: {email}\nPhone: {phone}\n\n\
         Summary:\n{summary}\n\n\
         Skills:\n{skills}\n\n\
         Experience:\n{experience}\n\n\
         Education:\n{education}",
        name = profile.name,
        email = profile.email,
        phone = profile.phone.as_deref().unwrap_or_default(),
        summary = sections.summary,
        skills = sections.skills,
        experience = sections.experience,
        education = sections.education,
    )
}
