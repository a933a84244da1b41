//! Built-in marker lists for the automated-mail rules
//!
//! All entries are lower case; inputs are lower-cased before matching.

/// Local parts used by role and system senders
pub const AUTOMATED_SENDERS: &[&str] = &[
    "noreply@",
    "no-reply@",
    "no_reply@",
    "donotreply@",
    "do-not-reply@",
    "do_not_reply@",
    "notification@",
    "notifications@",
    "notify@",
    "alert@",
    "alerts@",
    "support@",
    "newsletter@",
    "newsletters@",
    "news@",
    "marketing@",
    "promotions@",
    "system@",
    "admin@",
    "automated@",
    "mailer-daemon@",
    "postmaster@",
    "bounce@",
    "bounces@",
    "billing@",
    "updates@",
];

/// Opt-out and preference-management wording in the body
pub const UNSUBSCRIBE_PHRASES: &[&str] = &[
    "unsubscribe",
    "opt out",
    "opt-out",
    "manage preferences",
    "manage your preferences",
    "email preferences",
    "update your preferences",
    "stop receiving",
    "list-unsubscribe",
    "you are receiving this email because",
    "you received this email because",
];

/// Subject wording typical of bulk and transactional mail
pub const BULK_SUBJECT_MARKERS: &[&str] = &[
    "newsletter",
    "digest",
    "notification",
    "password reset",
    "reset your password",
    "verify your email",
    "confirm your email",
    "invoice",
    "receipt",
    "order confirmation",
    "shipping confirmation",
    "your order",
    "promotional",
    "special offer",
    "weekly update",
    "monthly update",
    "security alert",
];

/// Link targets that point at subscription management
pub const UNSUBSCRIBE_LINK_PATTERN: &str =
    r#"href\s*=\s*["']?[^"'\s>]*(?:unsubscribe|opt[-_]out|preferences|manage[-_]subscription)"#;

/// Disclaimers and email service provider names
pub const AUTOMATED_PLATFORM_MARKERS: &[&str] = &[
    "this is an automated",
    "this email was sent automatically",
    "automatically generated",
    "please do not reply to this email",
    "sent via",
    "powered by",
    "mailchimp",
    "sendgrid",
    "mailgun",
    "constant contact",
    "campaign monitor",
    "hubspot",
    "klaviyo",
    "sendinblue",
    "brevo",
    "amazon ses",
];
