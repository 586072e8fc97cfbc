//! Fixed instruction template for the generation oracle.
//!
//! The behavioral contract (pin-cites, no-invention, simple-question
//! carve-out) is enforced by instruction, not by code; tests assert on the
//! template text, never on model output.

const QUESTION_SLOT: &str = "{question}";
const CONTEXT_SLOT: &str = "{context}";

const TEMPLATE: &str = r#"You are a legal research assistant. Follow this plan:
1) Extract timeline events, dates, amounts, identifiers with pin-cites.
2) Enumerate objections/clauses/citations with pin-cites.
3) Reconcile referenced sections/annexures; if missing, output a Missing-but-referenced note.
4) Run a completeness checklist: timeline start to end, objections with all cited cases, clause refs quoted or flagged, ombudsman posture, non-joinder if applicable.
5) Add confidence tags (High/Med/Low) based on redundancy and section type.

For simple questions stick to giving really simple, 1-2 sentence concise answers, instead of giving a full description of the timeline and case.
Below are some question, answer example pairs:

simple_question: On what date X thing happened,
answer: X happened on Y date

simple_question: How much money was given to X,
answer: Y amount of money was given to X

simple_question: Who is the buyer and seller,
answer: Buyer: X, Seller: Y

Do not overcomplicate these type of simple questions, just give what I am asking for.

Always:
- Use bullet points and short sections.
- Add [page X] after each bullet when page_number is available; otherwise [page ?].
- Never invent text not in context; if missing, state "Missing from provided context."

Question: {question}

Context:
{context}

Answer:
"#;

/// Fill the instruction template with the question and assembled evidence.
///
/// The slots are located in the template itself, so user text containing a
/// literal `{context}` cannot hijack the evidence position.
pub fn build_prompt(question: &str, context: &str) -> String {
    let (head, tail) = TEMPLATE.split_once(QUESTION_SLOT).unwrap_or((TEMPLATE, ""));
    let (mid, end) = tail.split_once(CONTEXT_SLOT).unwrap_or((tail, ""));

    let mut out = String::with_capacity(TEMPLATE.len() + question.len() + context.len());
    out.push_str(head);
    out.push_str(question);
    out.push_str(mid);
    out.push_str(context);
    out.push_str(end);
    out
}
