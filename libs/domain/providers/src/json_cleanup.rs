// [libs/domain/providers/src/json_cleanup.rs]
/*!
 * APARATO: GEMINI OUTPUT CLEANUP
 * RESPONSABILIDAD: Para respuestas de la familia Gemini, despoja
 * bloques de codigo delimitados y, cuando se pidio JSON, extrae la
 * primera subcadena balanceada `{...}` o `[...]`, validandola por
 * parseo. Si falla, retorna el texto crudo — SPEC_FULL.md §4.1.
 */

/// Elimina vallas de codigo Markdown (```json ... ``` o ``` ... ```).
pub fn strip_code_fences(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Some(stripped) = trimmed.strip_prefix("```") {
        let without_lang = stripped
            .strip_prefix("json")
            .or_else(|| stripped.strip_prefix("JSON"))
            .unwrap_or(stripped);
        let without_lang = without_lang.strip_prefix('\n').unwrap_or(without_lang);
        if let Some(end) = without_lang.rfind("```") {
            return without_lang[..end].trim().to_string();
        }
        return without_lang.trim().to_string();
    }
    trimmed.to_string()
}

/// Extrae la primera subcadena balanceada de objeto o arreglo JSON y la
/// valida parseandola. Retorna `None` si ninguna subcadena balanceada
/// parsea como JSON valido.
pub fn extract_balanced_json(raw: &str) -> Option<String> {
    let bytes = raw.as_bytes();
    for (start, &opening) in bytes.iter().enumerate() {
        let closing = match opening {
            b'{' => b'}',
            b'[' => b']',
            _ => continue,
        };

        let mut depth: i32 = 0;
        let mut in_string = false;
        let mut escaped = false;

        for (offset, &byte) in bytes[start..].iter().enumerate() {
            if in_string {
                if escaped {
                    escaped = false;
                } else if byte == b'\\' {
                    escaped = true;
                } else if byte == b'"' {
                    in_string = false;
                }
                continue;
            }

            match byte {
                b'"' => in_string = true,
                b if b == opening => depth += 1,
                b if b == closing => {
                    depth -= 1;
                    if depth == 0 {
                        let candidate = &raw[start..=start + offset];
                        if serde_json::from_str::<serde_json::Value>(candidate).is_ok() {
                            return Some(candidate.to_string());
                        }
                        break;
                    }
                }
                _ => {}
            }
        }
    }
    None
}

/// Punto de entrada unico usado por el adaptador Gemini: limpia vallas
/// de codigo y, si se esperaba JSON, intenta extraer y validar la
/// primera estructura balanceada. Ante cualquier fallo, cae de vuelta
/// al texto crudo (fail-soft, consistente con SPEC_FULL.md §4.1).
pub fn cleanup_gemini_output(raw: &str, expects_json: bool) -> String {
    let defenced = strip_code_fences(raw);
    if !expects_json {
        return defenced;
    }
    extract_balanced_json(&defenced).unwrap_or(defenced)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_fenced_block() {
        let raw = "```json\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fences(raw), "{\"a\": 1}");
    }

    #[test]
    fn extracts_balanced_object_amid_prose() {
        let raw = "Here is the result: {\"a\": [1, 2], \"b\": \"x\"} — done.";
        let extracted = extract_balanced_json(raw).expect("should extract");
        assert_eq!(extracted, "{\"a\": [1, 2], \"b\": \"x\"}");
    }

    #[test]
    fn falls_back_to_raw_text_when_nothing_parses() {
        let raw = "no json here, just prose {unterminated";
        assert_eq!(cleanup_gemini_output(raw, true), raw);
    }

    #[test]
    fn ignores_braces_inside_strings_when_matching_depth() {
        let raw = "{\"text\": \"a } b { c\"}";
        let extracted = extract_balanced_json(raw).expect("should extract");
        assert_eq!(extracted, raw);
    }
}
