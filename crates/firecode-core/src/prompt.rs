//! Prompt composer: turns structured form input plus the static knowledge base
//! into inert request payloads. Three families — inspection report, grounded
//! follow-up chat, and defect-to-citation (NTC) mapping — plus the general
//! expert mode. Nothing here performs I/O; callers dispatch the payloads and
//! map failures to user-facing errors.

use crate::knowledge::FIRE_CODE_CONTEXT;
use crate::shared::{SearchParams, ValidationError};

/// Temperature for report and NTC generation: low, for factual accuracy
/// against the grounding context.
pub const REPORT_TEMPERATURE: f32 = 0.2;
/// Temperature for the expert assistant: lowest, citations must be exact.
pub const EXPERT_TEMPERATURE: f32 = 0.1;

/// One inert request: system instruction + user turn + sampling temperature.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptPayload {
    pub system_instruction: String,
    pub user_prompt: String,
    pub temperature: f32,
}

/// System instruction for an open-ended dialog (no initial user turn).
#[derive(Debug, Clone, PartialEq)]
pub struct SessionInstruction {
    pub system_instruction: String,
    pub temperature: Option<f32>,
}

const REPORT_SYSTEM_TEMPLATE: &str = r#"
Role:
You are Super FC AI, an intelligent Fire Code reference and inspection assistant for the Bureau of Fire Protection (BFP).

Primary Function:
Analyze the provided Fire Code context (based on RA 9514 and its RIRR) and return accurate, structured, and inspection-ready information based on the user's establishment details.

Context (Your Memory Base):
{context}

Response Behavior:
1.  **Establishment Overview**: Classify the occupancy based on the input.
2.  **Fire Safety Requirements**: List specific requirements (Egress, Alarms, Sprinklers) based on the size, number of stories, and type provided. Cite specific sections from the Context if available.
3.  **Inspection Checklist**: Provide a bulleted list of items an inspector should check physically.
4.  **Legal Basis**: Cite the specific Section/Rule numbers found in the context.
5.  **Notes for Inspector**: Practical reminders or common deficiencies for this specific type.

Constraint:
- Use ONLY the provided context as the source of truth.
- If information is not found in the context for a specific query, state "No direct reference found in the uploaded files."
- Use Markdown for formatting.
- Be professional and direct.
"#;

const REPORT_USER_TEMPLATE: &str = r#"
Generate a Fire Safety Inspection Report for:
- Type of Establishment: {establishment_type}
- Measurement: {area} SQM
- Number of Stories: {stories}
"#;

const CHAT_SYSTEM_TEMPLATE: &str = r#"
You are Super FC AI, a helpful Fire Safety assistant.
The user is viewing a generated inspection report based on RA 9514.
Answer their follow-up questions specifically about the report or general fire safety rules.
Always refer to the provided context if possible.

CONTEXT REPORT:
{report}

ORIGINAL REFERENCE MATERIAL:
{context}
"#;

const EXPERT_SYSTEM_TEMPLATE: &str = r#"
You are Super FC AI, the ultimate expert on Republic Act No. 9514 (Fire Code of the Philippines) and its 2019 Revised Implementing Rules and Regulations (RIRR).

Your goal is to provide highly detailed, authoritative, and structured responses.

Source Knowledge Base:
{context}

STRICT RESPONSE STRUCTURE:
For every inquiry, you must organize your response using these EXACT headers. Use bullet points for detailed sections to make them easier to read.

### 🏷️ TITLE/LABEL
(A concise title for the topic.)

### 📖 EXPLANATION
(Provide a deep technical explanation. **USE BULLET POINTS** to break down the logic, physical requirements, and technical standards. Be extremely detailed.)

### ⚖️ LEGAL BASIS
(Provide accurate citations. **USE BULLET POINTS**. Format: "Section 10.X.X.X para X of the RIRR 2019". Cite multiple sections if they overlap.)

### 💰 PENALTIES
(State the exact PHP amounts of administrative fines from Rule 13. Example: "Failure to provide fire alarm: Php 25,000.00 to Php 37,500.00". Mention possible 'Abatement Orders' or 'Closure'.)

### 🛠️ RECOMMENDATION
(Provide actionable steps for the building owner or inspector to ensure 100% compliance.)

### 💡 ADDITIONAL INSIGHT
(Any other helpful information or common inspection pitfalls.)

IMPORTANT RULES:
- If a citation is not in your context, do not make one up.
- Use professional, authoritative, but helpful language.
- Ensure all numbers and amounts are clear.
"#;

const NTC_SYSTEM_TEMPLATE: &str = r#####"
Role:
You are Super FC AI, an intelligent Fire Code reference assistant.

Task:
Convert the list of observed violations into a structured Notice to Comply (NTC) detail list.

Context:
{context}

Instructions:
1. Output ONLY the list of defects.
2. Follow this strict format for every item:

   ### [Defect Description]
   #### Legal Basis: [Section X.X.X.X (Topic Name)]
   **Explanation:** [Detailed explanation of the requirement and the violation]

   <br>
   <hr>
   <br>

3. EXAMPLE:
   ### Alarm Bell/Horn Not Audible
   #### Legal Basis: Section 10.2.17.3 (Protection - Alarm) and General Inspection Notes (Regular testing of fire alarms)
   **Explanation:** The fire alarm system must be capable of providing an audible signal that is clearly heard throughout the occupied areas to effectively alert occupants in case of a fire emergency. An inaudible alarm bell/horn indicates a failure in the system's functionality.

   <br>
   <hr>
   <br>

4. Use strictly RA 9514 (RIRR 2019) references.
5. IMPORTANT: The "Legal Basis" line must start with "####" so it renders as a header.
"#####;

const NTC_USER_TEMPLATE: &str = r#"
Establishment Details:
- Type: {establishment_type}
- Area: {area} SQM
- Stories: {stories}

Observed Violations/Defects:
{violations}

Generate the detailed NTC list.
"#;

/// Builds the inspection-report request for the given establishment details.
/// The knowledge base is embedded as the model's only source of truth.
pub fn report_payload(params: &SearchParams) -> PromptPayload {
    PromptPayload {
        system_instruction: REPORT_SYSTEM_TEMPLATE.replace("{context}", FIRE_CODE_CONTEXT),
        user_prompt: REPORT_USER_TEMPLATE
            .replace("{establishment_type}", params.type_label())
            .replace("{area}", params.area.trim())
            .replace("{stories}", params.stories.trim()),
        temperature: REPORT_TEMPERATURE,
    }
}

/// System instruction for a follow-up chat grounded on a previously generated
/// report plus the knowledge base.
pub fn chat_instruction(report_context: &str) -> SessionInstruction {
    SessionInstruction {
        system_instruction: CHAT_SYSTEM_TEMPLATE
            .replace("{report}", report_context)
            .replace("{context}", FIRE_CODE_CONTEXT),
        temperature: None,
    }
}

/// System instruction for the general expert assistant (strict sectioned
/// response format, exact citations and penalty amounts).
pub fn expert_instruction() -> SessionInstruction {
    SessionInstruction {
        system_instruction: EXPERT_SYSTEM_TEMPLATE.replace("{context}", FIRE_CODE_CONTEXT),
        temperature: Some(EXPERT_TEMPERATURE),
    }
}

/// Merges checklist selections with an optional free-text observation into the
/// final violation list. The free-text entry, if any, goes last.
pub fn compose_violations(selected: &[String], other_observations: &str) -> Vec<String> {
    let mut violations: Vec<String> = selected
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    let other = other_observations.trim();
    if !other.is_empty() {
        violations.push(other.to_string());
    }
    violations
}

/// Builds the defect-to-citation (NTC) request. Fails locally when no defect
/// was selected or typed — nothing is composed or dispatched in that case.
pub fn ntc_payload(params: &SearchParams, violations: &[String]) -> Result<PromptPayload, ValidationError> {
    if violations.is_empty() {
        return Err(ValidationError::NoDefects);
    }
    let numbered = violations
        .iter()
        .enumerate()
        .map(|(i, v)| format!("{}. {}", i + 1, v))
        .collect::<Vec<_>>()
        .join("\n");
    Ok(PromptPayload {
        system_instruction: NTC_SYSTEM_TEMPLATE.replace("{context}", FIRE_CODE_CONTEXT),
        user_prompt: NTC_USER_TEMPLATE
            .replace("{establishment_type}", params.type_label())
            .replace("{area}", params.area.trim())
            .replace("{stories}", params.stories.trim())
            .replace("{violations}", &numbered),
        temperature: REPORT_TEMPERATURE,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::EstablishmentType;

    fn sample_params() -> SearchParams {
        SearchParams {
            establishment_type: Some(EstablishmentType::Mercantile),
            area: "450".to_string(),
            stories: "3".to_string(),
        }
    }

    #[test]
    fn report_payload_embeds_context_and_params() {
        let payload = report_payload(&sample_params());
        assert!(payload.system_instruction.contains("MERCANTILE OCCUPANCY"));
        assert!(payload.system_instruction.contains("No direct reference found"));
        assert!(payload.user_prompt.contains("Type of Establishment: Mercantile"));
        assert!(payload.user_prompt.contains("Measurement: 450 SQM"));
        assert!(payload.user_prompt.contains("Number of Stories: 3"));
        assert_eq!(payload.temperature, REPORT_TEMPERATURE);
    }

    #[test]
    fn chat_instruction_grounds_on_report_and_reference() {
        let instruction = chat_instruction("## Generated Report Body");
        assert!(instruction.system_instruction.contains("## Generated Report Body"));
        assert!(instruction.system_instruction.contains("GENERAL INSPECTION NOTES"));
        assert!(instruction.temperature.is_none());
    }

    #[test]
    fn expert_instruction_uses_strict_structure() {
        let instruction = expert_instruction();
        assert!(instruction.system_instruction.contains("LEGAL BASIS"));
        assert!(instruction.system_instruction.contains("PENALTIES"));
        assert_eq!(instruction.temperature, Some(EXPERT_TEMPERATURE));
    }

    #[test]
    fn ntc_requires_at_least_one_violation() {
        assert_eq!(
            ntc_payload(&sample_params(), &[]).unwrap_err(),
            ValidationError::NoDefects
        );
    }

    #[test]
    fn ntc_numbers_violations_in_order() {
        let violations = compose_violations(
            &["Alarm bell/horn not audible".to_string(), String::new()],
            "  Blocked stairwell on 2F  ",
        );
        assert_eq!(violations.len(), 2);
        let payload = ntc_payload(&sample_params(), &violations).unwrap();
        assert!(payload.user_prompt.contains("1. Alarm bell/horn not audible"));
        assert!(payload.user_prompt.contains("2. Blocked stairwell on 2F"));
        assert!(payload.system_instruction.contains("#### Legal Basis:"));
    }

    #[test]
    fn compose_violations_without_input_is_empty() {
        assert!(compose_violations(&[], "   ").is_empty());
    }
}
