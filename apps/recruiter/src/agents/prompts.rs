// Prompt templates for the stateless agents.
// Placeholders are `{name}`; fill with `Prompt` before sending.

// ── Job descriptions ────────────────────────────────────────────────────────

/// Replace: {title}, {skills}, {experience_level}, {additional_info}
pub const JD_GENERATE_PROMPT_TEMPLATE: &str = r#"You are an expert recruitment specialist tasked with creating a professional, detailed job description.

Job Details:
- Title: {title}
- Required Skills: {skills}
- Experience Level: {experience_level}
{additional_info}
Generate a comprehensive job description with the following sections:
1. Company Overview (create a fictional tech company if not specified)
2. Role Overview
3. Key Responsibilities
4. Required Qualifications
5. Preferred Qualifications
6. Benefits and Perks

Format the job description professionally with appropriate headings.
Make it informative yet concise, focusing on clarity and relevance."#;

/// Replace: {job_description}, {feedback}
pub const JD_REFINE_PROMPT_TEMPLATE: &str = r#"You are an expert recruitment specialist tasked with refining a job description based on specific feedback.

Original Job Description:
{job_description}

Feedback to Address:
{feedback}

Please produce an improved version of the job description that addresses all the feedback points while maintaining a professional tone and comprehensive coverage of all required sections."#;

// ── Resume matching ─────────────────────────────────────────────────────────

/// Replace: {job_description}, {resume}, {analysis_instruction}, {analysis_format}
pub const RESUME_MATCH_PROMPT_TEMPLATE: &str = r#"You are an expert AI recruitment assistant tasked with evaluating how well a candidate's resume matches a job description.

Job Description:
{job_description}

Resume:
{resume}

Your task:
1. Identify key skills, experience, and qualifications from the job description
2. Evaluate how well the resume matches these requirements
3. Assign a match score from 0 to 100, where:
   - 0-20: Poor match, missing most key requirements
   - 21-40: Below average match, missing many key requirements
   - 41-60: Average match, meets some key requirements
   - 61-80: Good match, meets most key requirements
   - 81-100: Excellent match, meets all or nearly all key requirements
{analysis_instruction}
Output format:
Score: [numerical score between 0-100]
{analysis_format}"#;

pub const RESUME_DETAILED_INSTRUCTION: &str =
    "4. Provide a detailed analysis of strengths and weaknesses\n";
pub const RESUME_DETAILED_FORMAT: &str = "Analysis: [your detailed analysis]";

// ── Sentiment ───────────────────────────────────────────────────────────────

/// Replace: {transcript}
pub const SENTIMENT_PROMPT_TEMPLATE: &str = r#"You are an expert in analyzing emotional tone, confidence, and sentiment in interview transcripts.

Interview Transcript:
{transcript}

Perform a detailed sentiment analysis of this interview transcript. Your analysis should include:

1. Overall Candidate Sentiment: Positive, Neutral, or Negative
2. Confidence Level: Rate from 1-10 with specific examples
3. Emotional Indicators: Identify specific emotions (enthusiasm, nervousness, etc.) with examples
4. Language Patterns: Analyze use of assertive vs. tentative language
5. Key Moments: Identify turning points or significant emotional shifts
6. Speaker Dynamics: Analyze interaction patterns if multiple speakers

For each aspect, provide specific examples from the transcript to support your analysis.
Format your response as a structured report with relevant sections and quotations."#;

/// Replace: {transcript}, {topics}
pub const SENTIMENT_TOPICS_PROMPT_TEMPLATE: &str = r#"You are an expert in analyzing emotional tone, confidence, and sentiment in interview transcripts.

Interview Transcript:
{transcript}

Focus your analysis on the following specific topics:
{topics}

For each topic, provide:
1. Sentiment (Positive, Neutral, or Negative)
2. Confidence Level (1-10)
3. Specific examples from the transcript
4. Emotional indicators when discussing this topic

Format your analysis by topic, with clear headings and examples for each."#;

/// Replace: {transcript}
pub const SENTIMENT_PROGRESSION_PROMPT_TEMPLATE: &str = r#"You are an expert in analyzing emotional progression and sentiment changes throughout interviews.

Interview Transcript:
{transcript}

Analyze how the candidate's sentiment, confidence, and emotional state change throughout the interview.

Your analysis should include:
1. Beginning Phase: Sentiment and confidence in first 25% of interview
2. Middle Phase: Sentiment and confidence in middle 50% of interview
3. Ending Phase: Sentiment and confidence in final 25% of interview
4. Key Turning Points: Identify specific moments where sentiment shifted
5. Overall Progression: Did confidence increase, decrease, or fluctuate?
6. Topic Correlation: Did certain topics trigger sentiment changes?

For each phase and turning point, provide specific examples from the transcript.
Format your response as a structured analysis with clear sections and evidence."#;

// ── Email ───────────────────────────────────────────────────────────────────

/// Replace: {email_type}, {recipient}, {job_title}, {company}, {additional_info}
pub const EMAIL_PROMPT_TEMPLATE: &str = r#"You are an expert recruitment communication specialist. Generate a professional, personalized email for the following scenario:

Email Type: {email_type}
Recipient: {recipient}
Job Title: {job_title}
Company: {company}
Additional Information:
{additional_info}
Write a professional email with the following requirements:
1. Create an appropriate subject line
2. Use a professional tone
3. Be concise but thorough
4. Include all necessary information
5. End with an appropriate call to action and signature

Output format:
Subject: [email subject]

[email body with signature]"#;

// ── Scheduling ──────────────────────────────────────────────────────────────

/// Replace: {interview_type}, {job_title}, {resume}
pub const PREPARATION_PROMPT_TEMPLATE: &str = r#"You are an expert recruitment specialist preparing for a {interview_type} interview for a {job_title} position.

Candidate's Resume:
{resume}

Generate a comprehensive interview preparation guide including:
1. 8-10 specific questions based on the candidate's background and the job requirements
2. Key areas to explore based on the candidate's experience
3. Skills to verify during the interview
4. Red flags to watch for
5. Recommended interview structure

Format the output clearly with appropriate sections and numbering."#;

// ── Hire recommendation ─────────────────────────────────────────────────────

/// Replace: {context}
pub const HIRE_ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are an expert hiring consultant analyzing an interview transcript to make a hiring recommendation.

{context}

Based on the provided information, conduct a thorough analysis and provide:

1. Candidate Strengths: Identify 3-5 key strengths demonstrated during the interview, with specific examples
2. Areas of Concern: Identify 3-5 potential weaknesses or areas for improvement, with specific examples
3. Technical Competency: Evaluate the candidate's technical skills relevant to the position (Scale: 1-10)
4. Cultural Fit: Assess how well the candidate would fit within the company culture (Scale: 1-10)
5. Communication Skills: Evaluate the candidate's communication abilities (Scale: 1-10)
6. Overall Recommendation: Provide a clear HIRE or NO-HIRE recommendation with justification
7. Development Areas: If hired, what areas should the candidate focus on developing

Format your analysis as a structured report with clear sections and specific examples from the interview."#;

/// Replace: {job_description}, {candidates}
pub const HIRE_COMPARE_PROMPT_TEMPLATE: &str = r#"You are an expert hiring consultant comparing multiple candidates for a position.

Job Description:
{job_description}

Candidate Information:
{candidates}

Compare these candidates and provide:
1. A comparative analysis of their strengths and weaknesses
2. A ranking of the candidates from most to least suitable
3. Justification for the ranking
4. Final recommendation on which candidate(s) to hire

Format your response as a structured report with clear sections and specific justifications."#;
