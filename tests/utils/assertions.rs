use tourney::StandingRow;

/// Fluent checks over a standings table
pub struct TableAssertion<'a> {
    rows: &'a [StandingRow],
}

impl<'a> TableAssertion<'a> {
    pub fn of(rows: &'a [StandingRow]) -> Self {
        Self { rows }
    }

    pub fn has_order(self, teams: &[&str]) -> Self {
        let actual: Vec<&str> = self.rows.iter().map(|r| r.team.as_str()).collect();
        assert_eq!(actual, teams, "unexpected standings order");
        self
    }

    pub fn is_densely_ranked(self) -> Self {
        for (index, row) in self.rows.iter().enumerate() {
            assert_eq!(
                row.position,
                Some(index as i32 + 1),
                "row for {} has position {:?}",
                row.team,
                row.position
            );
        }
        self
    }

    pub fn team(self, team: &str, check: impl FnOnce(&StandingRow)) -> Self {
        let row = self
            .rows
            .iter()
            .find(|r| r.team == team)
            .unwrap_or_else(|| panic!("no row for team {}", team));
        check(row);
        self
    }
}
