use super::description::GrammarDescription;

pub type ProductionText = (String, Vec<String>);

peg::parser! {

    pub grammar grammar_parser() for str {

        rule word() -> String =
            s:$([^ ' ' | '\t' | '\r' | '\n' | ',' | '{' | '}' | ';' | '|']+) {
                s.to_string()
            }

        rule symbol_list() -> Vec<String> =
            "{" _ items:(word() ** (_ "," _)) _ "}" { items }

        rule nonterminals() -> Vec<String> =
            "N" _ "=" _ items:symbol_list() { items }

        rule terminals() -> Vec<String> =
            "T" _ "=" _ items:symbol_list() { items }

        rule start_symbol() -> String =
            "start" _ "=" _ s:word() { s }

        rule lhs() -> String =
            s:$((!"->" [^ ' ' | '\t' | '\r' | '\n' | ';' | '|'])+) {
                s.to_string()
            }

        rule alternative() -> String =
            s:$([^ ' ' | '\t' | '\r' | '\n' | ';' | '|']+) {
                s.to_string()
            }

        rule more_alternatives() -> String =
            _ "|" _ a:alternative() { a }

        rule production() -> ProductionText =
            name:lhs() _ "->" _ first:alternative() rest:more_alternatives()* _ ";" {
                let mut rest = rest;
                rest.insert(0, first);
                (name, rest)
            }

        pub rule description() -> GrammarDescription =
            _ nonterminals:nonterminals() _ terminals:terminals() _ start_symbol:start_symbol() _
            productions:(production() ** _) _ {
                GrammarDescription {
                    nonterminals,
                    terminals,
                    productions,
                    start_symbol,
                    chomsky_type: None,
                    grammar_style: None,
                }
            }

        rule comment() = "#" [^ '\n']*

        rule _() = quiet!{([' ' | '\r' | '\n' | '\t'] / comment())*}

    }
}
