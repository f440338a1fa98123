//! License page: static copyright and license terms.

use fms_link::User;

const TERMS: [(&str, &str); 5] = [
    (
        "1. Grant of License",
        "Botivate Services LLP grants you a non-exclusive, non-transferable license to use this software solely for your internal business operations.",
    ),
    (
        "2. Restrictions",
        "You may not modify, adapt, or create derivative works\n\
         You may not reverse engineer, decompile, or disassemble the software\n\
         You may not distribute, sublicense, or transfer the software to third parties\n\
         You may not remove or alter any copyright notices",
    ),
    (
        "3. Intellectual Property",
        "All intellectual property rights in and to the software remain the exclusive property of Botivate Services LLP.",
    ),
    (
        "4. Support and Maintenance",
        "Technical support and software updates are provided as per the terms of your service agreement.",
    ),
    (
        "5. Termination",
        "This license is effective until terminated. Botivate Services LLP may terminate this license if you fail to comply with any terms.",
    ),
];

pub fn license_text(user: &User) -> String {
    let mut text = String::from("License Agreement\n\n© BOTIVATE SERVICES LLP\n");
    text.push_str(
        "This software is developed exclusively by Botivate Services LLP for use by its clients.\n\n",
    );
    text.push_str("Warning: Unauthorized use, distribution, or copying of this software is strictly prohibited and may result in legal action.\n\n");
    for (heading, body) in TERMS {
        text.push_str(heading);
        text.push('\n');
        text.push_str(body);
        text.push_str("\n\n");
    }
    text.push_str(&format!(
        "Licensed to: {} ({})",
        user.display_name(),
        user.role.as_deref().unwrap_or("user")
    ));
    text
}
