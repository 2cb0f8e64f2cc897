//! Narrative prompt templates, one per reading layout.

use shared::{
    domain::{DecisionOptions, PromptTemplate, ReadingMode, ResolvedCard},
    protocol::NarrativePrompt,
};

pub const SYSTEM_PERSONA: &str = "You are an experienced tarot reader. You interpret the cards \
    drawn for the querent with warmth and honesty, connect each card to its position in the \
    spread, and turn the reading into practical, compassionate guidance. You never claim \
    certainty about the future.";

pub const FALLBACK_NARRATIVE: &str = "The cards have been drawn, but we are unable to \
    generate your guidance right now. Please take a moment with the cards above and try \
    again a little later.";

const LANGUAGE_RULE: &str =
    "Write the entire answer in the same language the question is written in.";

pub struct PromptContext<'a> {
    pub mode: &'a ReadingMode,
    pub question: &'a str,
    pub cards: &'a [ResolvedCard],
    pub options: Option<&'a DecisionOptions>,
}

type BuildFn = fn(&PromptContext<'_>, &TemplateSpec) -> String;

pub struct TemplateSpec {
    pub template: PromptTemplate,
    pub word_target: u32,
    pub framing: &'static str,
    build: BuildFn,
}

static THREE_CARD_SPEC: TemplateSpec = TemplateSpec {
    template: PromptTemplate::ThreeCard,
    word_target: 250,
    framing: "Read the cards as a story that moves from the past through the present \
        into the likely future, and close with one piece of concrete advice.",
    build: build_three_card,
};

static DECISION_SPEC: TemplateSpec = TemplateSpec {
    template: PromptTemplate::Decision,
    word_target: 300,
    framing: "Compare what each card reveals about its option, weigh the strengths and \
        risks of both paths, and finish with a clear recommendation while leaving the \
        final choice to the querent.",
    build: build_decision,
};

static RELATIONSHIP_SPEC: TemplateSpec = TemplateSpec {
    template: PromptTemplate::Relationship,
    word_target: 350,
    framing: "Interpret each position of the relationship cross in order, describe the \
        emotional dynamic between the two people, and suggest how the querent can nurture \
        the connection.",
    build: build_relationship,
};

pub fn template_spec(template: PromptTemplate) -> &'static TemplateSpec {
    match template {
        PromptTemplate::ThreeCard => &THREE_CARD_SPEC,
        PromptTemplate::Decision => &DECISION_SPEC,
        PromptTemplate::Relationship => &RELATIONSHIP_SPEC,
    }
}

pub fn build_prompt(ctx: &PromptContext<'_>, max_tokens: u32, temperature: f32) -> NarrativePrompt {
    let spec = template_spec(ctx.mode.template);
    NarrativePrompt {
        system: SYSTEM_PERSONA.to_string(),
        user: (spec.build)(ctx, spec),
        max_tokens,
        temperature,
    }
}

fn build_three_card(ctx: &PromptContext<'_>, spec: &TemplateSpec) -> String {
    let mut out = String::with_capacity(512);
    out.push_str("I drew a ");
    out.push_str(&ctx.cards.len().to_string());
    out.push_str("-card tarot spread (");
    out.push_str(&ctx.mode.position_labels.join(", "));
    out.push_str(") for this question:\n");
    push_question(&mut out, ctx.question);
    out.push('\n');
    push_cards(&mut out, ctx.cards);
    push_closing(&mut out, spec);
    out
}

fn build_decision(ctx: &PromptContext<'_>, spec: &TemplateSpec) -> String {
    let mut out = String::with_capacity(640);
    out.push_str("I am facing a decision and drew one tarot card for each option.\n");
    out.push_str("Decision: ");
    push_question(&mut out, ctx.question);
    if let Some(options) = ctx.options {
        out.push_str("Option 1: ");
        out.push_str(&options.first);
        out.push('\n');
        out.push_str("Option 2: ");
        out.push_str(&options.second);
        out.push('\n');
    }
    out.push('\n');
    push_cards(&mut out, ctx.cards);
    push_closing(&mut out, spec);
    out
}

fn build_relationship(ctx: &PromptContext<'_>, spec: &TemplateSpec) -> String {
    let mut out = String::with_capacity(768);
    out.push_str("I drew a five-card relationship cross. My question about the relationship:\n");
    push_question(&mut out, ctx.question);
    out.push('\n');
    push_cards(&mut out, ctx.cards);
    push_closing(&mut out, spec);
    out
}

fn push_question(out: &mut String, question: &str) {
    out.push('"');
    out.push_str(question);
    out.push_str("\"\n");
}

fn push_cards(out: &mut String, cards: &[ResolvedCard]) {
    out.push_str("Cards:\n");
    for card in cards {
        out.push_str("- ");
        out.push_str(&card.position);
        out.push_str(": ");
        out.push_str(&card.name);
        if let Some(meaning) = card.meaning.as_deref().filter(|m| !m.trim().is_empty()) {
            out.push_str(" (traditional meaning: ");
            out.push_str(meaning);
            out.push(')');
        }
        out.push('\n');
    }
}

fn push_closing(out: &mut String, spec: &TemplateSpec) {
    out.push('\n');
    out.push_str(spec.framing);
    out.push_str("\nKeep the reading to about ");
    out.push_str(&spec.word_target.to_string());
    out.push_str(" words. ");
    out.push_str(LANGUAGE_RULE);
}
