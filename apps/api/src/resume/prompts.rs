// Resume structuring and LaTeX prompt templates.

/// Structuring prompt. Replace `{resume_text}` before sending.
pub const STRUCTURE_PROMPT_TEMPLATE: &str = r#"You are an AI system that extracts and structures resume content.
Transform the provided textual content into a structured format without omitting any details.
Use null for any scalar you cannot find and [] for any empty list.

Return a JSON object with this EXACT schema:
{
  "name": "<Extracted Name>",
  "contact": {
    "email": "<Extracted Email>",
    "phone": "<Extracted Phone>",
    "linkedin": "<LinkedIn Profile>",
    "website": "<Personal Website or Portfolio>"
  },
  "role": "<Extracted Role>",
  "summary": "<Brief Professional Summary>",
  "skills": ["<Skill 1>", "<Skill 2>"],
  "work_experience": [
    {
      "company": "<Company Name>",
      "position": "<Job Title>",
      "location": "<Company Location>",
      "start_date": "<Start Date>",
      "end_date": "<End Date or 'Present'>",
      "experience_details": ["<Work Experience Detail 1>", "<Work Experience Detail 2>"]
    }
  ],
  "education": [
    {
      "college_name": "<College Name>",
      "degree": "<Degree Name>",
      "field_of_study": "<Field of Study>",
      "start_date": "<Start Date>",
      "end_date": "<End Date or 'Ongoing'>",
      "gpa": "<GPA (if available)>"
    }
  ],
  "projects": [
    {
      "project_name": "<Project Name>",
      "description": "<Project Description>",
      "technologies": ["<Technology 1>", "<Technology 2>"],
      "link": "<Project URL>"
    }
  ],
  "certifications": [
    {
      "certification_name": "<Certification Name>",
      "issuing_organization": "<Issuing Organization>",
      "issue_date": "<Issue Date>",
      "expiration_date": "<Expiration Date or 'Ongoing'>",
      "details": "<Certification Details>"
    }
  ],
  "publications": [
    {
      "title": "<Publication Title>",
      "journal": "<Journal or Conference Name>",
      "publication_date": "<Publication Date>",
      "link": "<Publication URL>"
    }
  ],
  "volunteer_experience": [
    {
      "organization": "<Organization Name>",
      "role": "<Volunteer Role>",
      "start_date": "<Start Date>",
      "end_date": "<End Date or 'Ongoing'>",
      "details": "<Details about the Volunteer Work>"
    }
  ],
  "awards": [
    {
      "award_name": "<Award Name>",
      "organization": "<Awarding Organization>",
      "year": "<Award Year>",
      "details": "<Award Details>"
    }
  ],
  "languages": [
    {"language": "<Language>", "proficiency": "<Proficiency Level>"}
  ],
  "interests": ["<Interest 1>", "<Interest 2>"]
}

{json_only}

RESUME TEXT:
{resume_text}"#;

pub const INTRODUCTION_SECTION: &str = "\
Convert the 'introduction' section from structured resume data into LaTeX format. \
Include the name, role, contact information, and a professional summary.";

pub const WORK_EXPERIENCE_SECTION: &str = "\
Convert the 'work_experience' section from structured resume data into LaTeX format. \
Each job entry should include company name, job title, start date, end date, and job description.";

pub const EDUCATION_SECTION: &str = "\
Convert the 'education' section from structured resume data into LaTeX format. \
Each entry should include college name, degree, field of study, start date, and end date.";

pub const OTHER_SECTIONS: &str = "\
Convert additional sections such as 'skills', 'certifications', 'projects', 'publications', \
'volunteer experience', 'awards', 'languages', and 'interests' into LaTeX format.";
