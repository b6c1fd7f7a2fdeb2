use lazy_static::lazy_static;
use regex::Regex;

pub const SYSTEM_INSTRUCTION: &str = r#"You are Nestor, the virtual assistant of MetroNest, a real-estate marketplace.
You help visitors search for homes to buy or rent, explain the buying and renting process,
describe how to book property tours and contact agents, and give general mortgage guidance.

RULES:
1. Keep answers short (under 120 words) and friendly.
2. Never invent specific listings, prices or agent names. Point users to the search page instead.
3. For legal or tax questions, recommend consulting a qualified professional.
4. Mention the mortgage calculator when users ask about monthly payments.
"#;

const DEFAULT_REPLY: &str = "I can help you find properties to buy or rent, book tours, reach an agent, or estimate mortgage payments. What would you like to do?";

struct Intent {
    pattern: Regex,
    reply: &'static str,
}

lazy_static! {
    // Checked in order; the first match wins.
    static ref INTENTS: Vec<Intent> = vec![
        Intent {
            pattern: Regex::new(r"(?i)\b(mortgage|loan|emi|interest rate|monthly payment|down ?payment)\b").unwrap(),
            reply: "Our mortgage calculator estimates your monthly payment from the price, down payment, rate and term. A 20% down payment usually avoids mortgage insurance.",
        },
        Intent {
            pattern: Regex::new(r"(?i)\b(tour|visit|viewing|showing|see the (house|property|place))\b").unwrap(),
            reply: "You can book a tour from any property page. Pick a date and time and the listing agent will confirm it. Manage your tours from your client dashboard.",
        },
        Intent {
            pattern: Regex::new(r"(?i)\b(rent|rental|renting|lease|tenant)\b").unwrap(),
            reply: "Looking to rent? Filter listings by status \"For Rent\" and set your budget and preferred city. Save the search to get alerts for new matches.",
        },
        Intent {
            pattern: Regex::new(r"(?i)\b(sell|selling|list my|listing my)\b").unwrap(),
            reply: "To sell, get in touch with one of our verified agents through the contact form. They will value your home and publish the listing for you.",
        },
        Intent {
            pattern: Regex::new(r"(?i)\b(buy|buying|purchase|for sale|own a home)\b").unwrap(),
            reply: "Browse properties marked \"For Sale\" and narrow them down by city, type, price and bedrooms. Add favorites to compare them later.",
        },
        Intent {
            pattern: Regex::new(r"(?i)\b(agent|realtor|broker|contact|talk to someone|call)\b").unwrap(),
            reply: "Every listing shows its agent's contact details, and you can send them an inquiry directly. For general questions, use our contact page.",
        },
        Intent {
            pattern: Regex::new(r"(?i)\b(price|cost|budget|afford|expensive|cheap)\b").unwrap(),
            reply: "Set a minimum and maximum price in the search filters to see homes within your budget. The mortgage calculator can help you work out what you can afford.",
        },
        Intent {
            pattern: Regex::new(r"(?i)\b(thanks|thank you|thx|cheers)\b").unwrap(),
            reply: "You're welcome! Let me know if there is anything else I can help with.",
        },
        Intent {
            pattern: Regex::new(r"(?i)^\s*(hi|hello|hey|good (morning|afternoon|evening))\b").unwrap(),
            reply: "Hello! I'm Nestor, the MetroNest assistant. Are you looking to buy, rent or sell?",
        },
    ];
}

/// Canned reply used when no AI provider is configured or the provider fails.
pub fn canned_reply(message: &str) -> &'static str {
    INTENTS
        .iter()
        .find(|intent| intent.pattern.is_match(message))
        .map(|intent| intent.reply)
        .unwrap_or(DEFAULT_REPLY)
}
