//! Firm profiles
//!
//! Every firm variant renders the same single-page template. A
//! [`FirmProfile`] carries everything that differs between them: palette,
//! marketing copy, contact details, and the chat assistant's persona.

/// Page sections, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SectionId {
    Home,
    About,
    Services,
    Contact,
}

impl SectionId {
    pub fn all() -> [SectionId; 4] {
        [
            SectionId::Home,
            SectionId::About,
            SectionId::Services,
            SectionId::Contact,
        ]
    }

    pub fn nav_label(&self) -> &'static str {
        match self {
            SectionId::Home => "Home",
            SectionId::About => "About",
            SectionId::Services => "Services",
            SectionId::Contact => "Contact",
        }
    }
}

/// 24-bit colours, kept framework-free so any front end can map them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub accent: (u8, u8, u8),
    pub ink: (u8, u8, u8),
    pub muted: (u8, u8, u8),
}

#[derive(Debug, Clone, Copy)]
pub struct Hero {
    pub eyebrow: &'static str,
    pub headline: &'static str,
    pub subheadline: &'static str,
    pub body: &'static str,
    pub call_to_action: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct Highlight {
    pub title: &'static str,
    pub body: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct About {
    pub eyebrow: &'static str,
    pub headline: &'static str,
    pub paragraphs: &'static [&'static str],
    pub highlights: &'static [Highlight],
    pub feature_list: &'static [&'static str],
}

#[derive(Debug, Clone, Copy)]
pub struct Service {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct Services {
    pub eyebrow: &'static str,
    pub headline: &'static str,
    pub items: &'static [Service],
}

#[derive(Debug, Clone, Copy)]
pub struct Contact {
    pub eyebrow: &'static str,
    pub headline: &'static str,
    pub location: &'static str,
    pub phone: Option<&'static str>,
    pub invitation: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct Footer {
    pub blurb: &'static str,
    pub legal_links: &'static [&'static str],
    pub locality: &'static str,
}

/// Copy and behaviour of the floating chat assistant.
#[derive(Debug, Clone, Copy)]
pub struct Assistant {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub greeting: &'static str,
    pub input_placeholder: &'static str,
    /// System instruction sent with every prompt. It must steer visitors to a
    /// human consultation for anything specific.
    pub persona: &'static str,
    /// Shown when the service answers with no text.
    pub empty_reply: &'static str,
    /// Shown when the call fails for any reason.
    pub failure_reply: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct FirmProfile {
    pub key: &'static str,
    pub name: &'static str,
    pub monogram: char,
    pub palette: Palette,
    pub hero: Hero,
    pub about: About,
    pub services: Services,
    pub contact: Contact,
    pub footer: Footer,
    pub assistant: Assistant,
}

impl FirmProfile {
    pub fn all() -> &'static [FirmProfile] {
        &PROFILES
    }

    pub fn by_key(key: &str) -> Option<&'static FirmProfile> {
        let key = key.trim().to_lowercase();
        PROFILES.iter().find(|p| p.key == key)
    }

    pub fn default_profile() -> &'static FirmProfile {
        &PROFILES[0]
    }
}

static PROFILES: [FirmProfile; 2] = [DCO, GENERAL];

const DCO: FirmProfile = FirmProfile {
    key: "dco",
    name: "D-Co Management Services",
    monogram: 'D',
    palette: Palette {
        accent: (79, 70, 229),
        ink: (15, 23, 42),
        muted: (100, 116, 139),
    },
    hero: Hero {
        eyebrow: "Professional Tax & Bookkeeping",
        headline: "Simplify Your Finances.",
        subheadline: "Empower Your Future.",
        body: "D-Co Management Services provides expert personalized tax planning and bookkeeping for individuals and small businesses across the GTA. We take the stress out of your numbers so you can focus on what matters most.",
        call_to_action: "Book Free Consultation",
    },
    about: About {
        eyebrow: "Our Legacy",
        headline: "Trusted Financial Partners Since 2014.",
        paragraphs: &[
            "Based in Mississauga, our Bookkeeping & Tax Service provides a personal touch to tax and accounting. We bridge the gap between complex government regulations and your unique financial goals.",
            "Our team consists of dedicated professionals who specialize in the Canadian tax landscape. From CRA audit support to strategic corporate restructuring, we offer the depth of a large firm with the agility of a boutique consultancy.",
        ],
        highlights: &[
            Highlight {
                title: "CRA Compliant",
                body: "Rigorous adherence to current tax codes and digital filing mandates.",
            },
            Highlight {
                title: "Always On Time",
                body: "Proactive scheduling ensures your submissions are early, every time.",
            },
        ],
        feature_list: &[
            "Real-time Expense Tracking",
            "Start-up Grant Consulting",
            "Incorporation Strategy",
            "Digital POS Connectivity",
        ],
    },
    services: Services {
        eyebrow: "What We Do",
        headline: "Services Built Around You",
        items: &[
            Service {
                id: "personal-tax",
                title: "Personal Tax",
                description: "Individual and family returns prepared with every credit and deduction you are entitled to.",
            },
            Service {
                id: "corporate-tax",
                title: "Corporate Tax",
                description: "T2 filings and year-end planning for incorporated businesses of every size.",
            },
            Service {
                id: "bookkeeping",
                title: "Bookkeeping",
                description: "Monthly reconciliations and clean, audit-ready ledgers you can actually read.",
            },
            Service {
                id: "payroll",
                title: "Payroll",
                description: "Employee deductions, remittances and year-end slips handled on schedule.",
            },
        ],
    },
    contact: Contact {
        eyebrow: "Get In Touch",
        headline: "Let's Talk About Your Numbers.",
        location: "Mississauga, Ontario",
        phone: None,
        invitation: "Book a free consultation and we will review your situation with you.",
    },
    footer: Footer {
        blurb: "Premium tax and bookkeeping services for individuals and corporations. Delivering precision and peace of mind since 2014.",
        legal_links: &["Privacy Policy", "Terms of Service"],
        locality: "Mississauga, Ontario.",
    },
    assistant: Assistant {
        title: "Financial Assistant",
        subtitle: "Powered by Gemini AI",
        greeting: "Hello! I am your Tax & Bookkeeping Virtual Assistant. How can I help you with your financial questions today?",
        input_placeholder: "Ask a tax question...",
        persona: "You are a professional and helpful financial assistant for a boutique tax and bookkeeping firm in Mississauga, Canada. Provide concise, accurate general tax advice for Canadians. Always remind users that for specific cases, they should book a formal consultation with our expert team. Be polite, clear, and professional.",
        empty_reply: "I'm sorry, I couldn't process that. Please try again or contact us directly.",
        failure_reply: "I'm having trouble connecting right now. Please feel free to call our office directly!",
    },
};

const GENERAL: FirmProfile = FirmProfile {
    key: "general",
    name: "General Bookkeeping Co.",
    monogram: 'G',
    palette: Palette {
        accent: (180, 131, 62),
        ink: (26, 26, 26),
        muted: (100, 116, 139),
    },
    hero: Hero {
        eyebrow: "Trusted Financial Management",
        headline: "Expert Guidance.",
        subheadline: "Simplified Books.",
        body: "General Bookkeeping Co. provides boutique accounting and tax strategies for small businesses and professionals across the Greater Toronto Area. We bring clarity to your compliance.",
        call_to_action: "Request a Consultation",
    },
    about: About {
        eyebrow: "Legacy of Excellence",
        headline: "The Power of Expert Analysis.",
        paragraphs: &[
            "With nearly a decade of dedicated service in Mississauga and the GTA, General Bookkeeping Co. has built a reputation for meticulous accuracy and proactive financial planning. We empower our clients with data-driven confidence.",
        ],
        highlights: &[
            Highlight {
                title: "CRA Compliance",
                body: "We stay current with evolving Canadian tax laws to ensure your business remains perfectly compliant.",
            },
            Highlight {
                title: "Absolute Precision",
                body: "Our detail-oriented approach means your records are always audit-ready and insightful.",
            },
        ],
        feature_list: &[],
    },
    services: Services {
        eyebrow: "Our Core Capabilities",
        headline: "Professional Services",
        items: &[
            Service {
                id: "tax",
                title: "Tax Strategy & Filing",
                description: "Comprehensive planning for individuals and corporations to optimize returns and minimize liabilities.",
            },
            Service {
                id: "bookkeeping",
                title: "Full-Cycle Bookkeeping",
                description: "Daily management of ledgers, reconciliations, and financial reporting with total transparency.",
            },
            Service {
                id: "payroll",
                title: "Payroll & HST Services",
                description: "Streamlined administration of employee deductions and sales tax reporting for modern operations.",
            },
        ],
    },
    contact: Contact {
        eyebrow: "Connect",
        headline: "Reach Our Partners.",
        location: "Mississauga, Ontario, Canada",
        phone: Some("+1 (647) 385-6490"),
        invitation: "Submit your information for a confidential review of your situation.",
    },
    footer: Footer {
        blurb: "Boutique financial intelligence for the Greater Toronto Area.",
        legal_links: &["Confidentiality Policy", "Terms of Service"],
        locality: "Mississauga, Ontario.",
    },
    assistant: Assistant {
        title: "Financial Assistant",
        subtitle: "Status: Operational",
        greeting: "Welcome to General Bookkeeping Co. I am your automated financial concierge. How may I assist with your management or tax inquiry today?",
        input_placeholder: "Confidential Inquiry...",
        persona: "You are the professional concierge for General Bookkeeping Co., a premium firm in Mississauga. Your tone is executive, precise, and highly capable. Provide general Canadian tax and bookkeeping guidance. Emphasize that for specific strategy, they must book a formal consultation with our principals.",
        empty_reply: "I'm sorry, I couldn't process that request.",
        failure_reply: "Error connecting to our concierge. Please try again later.",
    },
};
