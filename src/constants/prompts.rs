pub const STUDY_PACKAGE_PROMPT: &str = "You are helping the learner study a document for an exam.

## DOCUMENT

--- START DOCUMENT ---
{document}
--- END DOCUMENT ---

## TASK

Produce a study package for this document, written in your persona's voice:

1. sweet_summary: 5 to 10 sentences describing what the document covers, its main ideas and why they matter for the exam.
2. study_guide.overall_advice: a plain explanation of what the document is mainly about, 6 to 10 sentences.
3. study_guide.exam_strategy: what to prioritise for the exam, common tricky concepts, relationships and formulas, 5 to 10 sentences.
4. study_guide.key_topics: the key topics as short names.
5. study_guide.topic_notes: for each topic a nuance_note (typical mistakes, tricky details, hidden assumptions) and why_important (one sentence).
6. questions: EXACTLY {question_count} multiple-choice questions on the most exam-relevant material.
   - introduction: a short in-persona warm-up line before the question.
   - question_text: a clear question with a single correct answer.
   - options: keys \"A\", \"B\", \"C\", \"D\" hold answer choices and key \"E\" is always \"Pass\".
   - correct_answer_key: one of \"A\" to \"D\", never \"E\".
   - correct_feedback_script, incorrect_feedback_script, pass_feedback_script: in-persona reactions for each outcome, each with a short academic explanation.
   - focus_if_wrong: the exact concept from the document to review if this question is missed.
   - romance_level: the intensity of the framing. The first question is 1, the last is {question_count}, and it never decreases.
7. daily_romantic_message_seed: a seed idea for a daily study message.
8. night_mode_message_seed: a seed idea for a short goodnight message.

## RULES

- Everything must be tied clearly to the document.
- Output MUST be a single JSON object matching the schema below. No markdown, no commentary, no code fences.

## JSON SCHEMA

{schema}
";

pub const ANSWER_FEEDBACK_PROMPT: &str = "You are writing feedback for question {question_number} of a quiz.

Question: {question_text}
Outcome: {outcome}

ALWAYS START WITH EXACTLY THESE TWO LINES:
{header}

After these two lines:

1. Explain briefly and factually why the correct answer is correct.
2. If the learner answered incorrectly, explain briefly why their answer was wrong.
3. Then react in your persona's voice to the outcome.

Keep it natural and unique, 5 to 8 lines in total. Do not output labels such as \"Explanation:\" and do not use markdown.

Emotional reference (do not copy): \"{tone_seed}\"
";

pub const POST_QUIZ_ADVICE_PROMPT: &str = "You are giving a post-quiz study recommendation to {name}.

Mood before the quiz: {mood_before}
Mood after the quiz: {mood_after}

These are the topics the learner was weak in:
{missed_topics}

Combine them into one clear, short study advice message in your persona's voice. Mention the areas to focus on next without repeating the list verbatim.

Output: ONE short paragraph.
";

pub const DAILY_MESSAGE_PROMPT: &str = "You are sending {name} a DAILY message about studying.

Context:
- Locale: {locale}
- Mood before the last quiz: {mood_before}
- Mood after the last quiz: {mood_after}
- Seed idea: \"{seed}\"

Write a short message in your persona's voice that motivates the learner to study a little today and gives one clear hint about the effort to make.

Output: one short message only.
";

pub const NIGHT_MESSAGE_PROMPT: &str = "You are sending {name} a NIGHT message.

Context:
- Locale: {locale}
- Seed idea: \"{seed}\"

Write a short goodnight message in your persona's voice. Tell the learner they did enough today and remind them to study again tomorrow.

Output: one short message only.
";

pub const SPECIAL_MESSAGE_PROMPT: &str = "Set your usual persona aside for this message.

Write a short, gentle blessing for {name} from {locale}, as if it came from a kind and wise higher power watching over their studies. Encourage patience, honest effort and rest. Keep it inclusive and free of any specific religious doctrine.

Mood after the last quiz: {mood_after}

Output: one short message only.
";

pub const FREEFORM_QUERY_PROMPT: &str = "The learner is asking a question about their study document.

## DOCUMENT

--- START DOCUMENT ---
{document}
--- END DOCUMENT ---

## QUESTION

{query}

Answer in your persona's voice using ONLY information from the document. If the document does not contain the answer, say so plainly. Keep it short.
";
